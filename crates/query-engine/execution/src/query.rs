//! Execute an execution plan against the database.

use std::time::{Duration, Instant};

use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite};
use tracing::{info_span, Instrument};

use dc_api_types::QueryResponse;
use query_engine_sql::sql;

use crate::error::{DecodeError, Error};

/// How many virtual machine instructions SQLite runs between deadline checks.
const PROGRESS_INTERVAL: i32 = 1000;

/// Execute a query against SQLite and decode the JSON it produces.
pub async fn execute(
    pool: &sqlx::SqlitePool,
    plan: &sql::execution_plan::ExecutionPlan<sql::execution_plan::Query>,
    timeout: Option<Duration>,
) -> Result<QueryResponse, Error> {
    let query = plan.query.query_sql();

    tracing::info!(
        generated_sql = query.sql,
        params = ?&query.params,
        root_table = plan.root_table,
    );

    fetch_response(pool, &query, &plan.query.result_column.name, timeout)
        .await
        .map_err(|err| log_failure(&query, err))
}

/// Convert a query to an EXPLAIN QUERY PLAN query and execute it against SQLite.
/// Returns the formatted statement and the detail line of each plan step.
pub async fn explain(
    pool: &sqlx::SqlitePool,
    plan: &sql::execution_plan::ExecutionPlan<sql::execution_plan::Query>,
    timeout: Option<Duration>,
) -> Result<(String, Vec<String>), Error> {
    let query = plan.query.explain_query_sql();

    tracing::info!(
        generated_sql = query.sql,
        params = ?&query.params,
        root_table = plan.root_table,
    );

    let lines = fetch_plan(pool, &query, timeout)
        .await
        .map_err(|err| log_failure(&query, err))?;

    let pretty = sqlformat::format(
        &plan.query.query_sql().sql,
        &sqlformat::QueryParams::None,
        sqlformat::FormatOptions::default(),
    );

    Ok((pretty, lines))
}

/// Check that the database answers a trivial statement with the expected single row.
pub async fn check_health(pool: &sqlx::SqlitePool) -> Result<bool, Error> {
    let mut connection = pool.acquire().await?;
    set_deadline(&mut connection, None).await?;
    let values: Vec<i64> = sqlx::query_scalar("select 1 where 1 = 1")
        .fetch_all(&mut *connection)
        .await?;
    Ok(values == [1])
}

async fn fetch_response(
    pool: &sqlx::SqlitePool,
    query: &sql::string::SQL,
    column: &str,
    timeout: Option<Duration>,
) -> Result<QueryResponse, Error> {
    let rows = fetch_all(pool, query, timeout).await?;
    let text = single_result(rows, column)?;

    // Make a response from the JSON text.
    async { text_to_response(&text) }
        .instrument(info_span!("Create response"))
        .await
}

async fn fetch_plan(
    pool: &sqlx::SqlitePool,
    query: &sql::string::SQL,
    timeout: Option<Duration>,
) -> Result<Vec<String>, Error> {
    let rows = fetch_all(pool, query, timeout).await?;
    Ok(rows
        .iter()
        .map(|row| row.try_get::<String, _>("detail"))
        .collect::<Result<Vec<_>, _>>()?)
}

/// Log a failed statement with its text, which the request log alone may not show.
fn log_failure(query: &sql::string::SQL, err: Error) -> Error {
    tracing::error!(
        generated_sql = query.sql,
        params = ?&query.params,
        error = %err,
        "statement failed"
    );
    err
}

/// Create a SQLx query based on our SQL query and bind our parameters to it.
fn build_query_with_params(
    query: &sql::string::SQL,
) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    query
        .params
        .iter()
        .fold(sqlx::query(query.sql.as_str()), |sqlx_query, param| {
            match param {
                sql::string::Param::String(s) => sqlx_query.bind(s.as_str()),
                sql::string::Param::Integer(i) => sqlx_query.bind(*i),
                sql::string::Param::Float(f) => sqlx_query.bind(*f),
            }
        })
}

/// Run a statement on a pooled connection. Once `timeout` has passed SQLite interrupts the
/// statement itself, so the connection is free for the next request.
async fn fetch_all(
    pool: &sqlx::SqlitePool,
    query: &sql::string::SQL,
    timeout: Option<Duration>,
) -> Result<Vec<SqliteRow>, Error> {
    let mut connection = pool.acquire().await?;
    let deadline = timeout.map(|duration| (duration, Instant::now() + duration));

    set_deadline(&mut connection, deadline.map(|(_, at)| at)).await?;
    let result = build_query_with_params(query)
        .fetch_all(&mut *connection)
        .await;
    set_deadline(&mut connection, None).await?;

    match (result, deadline) {
        (Ok(rows), _) => Ok(rows),
        (Err(err), Some((duration, at))) if Instant::now() >= at => {
            tracing::debug!(error = %err, "statement interrupted at its deadline");
            Err(Error::Timeout(duration))
        }
        (Err(err), _) => Err(err.into()),
    }
}

/// Install a progress handler that interrupts whatever runs on the connection after
/// `deadline`, or remove it. A connection returns to the pool with no handler installed.
async fn set_deadline(
    connection: &mut PoolConnection<Sqlite>,
    deadline: Option<Instant>,
) -> Result<(), sqlx::Error> {
    let mut handle = connection.lock_handle().await?;
    match deadline {
        None => {
            handle.remove_progress_handler();
        }
        Some(deadline) => {
            handle.set_progress_handler(PROGRESS_INTERVAL, move || Instant::now() < deadline);
        }
    }
    Ok(())
}

/// The statement selects exactly one row whose result column holds the response.
fn single_result(rows: Vec<sqlx::sqlite::SqliteRow>, column: &str) -> Result<String, Error> {
    let mut rows = rows.into_iter();
    let row = match (rows.next(), rows.len()) {
        (None, _) => Err(DecodeError::NoRows),
        (Some(row), 0) => Ok(row),
        (Some(_), rest) => Err(DecodeError::TooManyRows(rest + 1)),
    }?;
    let text: Option<String> = row.try_get(column)?;
    Ok(text.ok_or_else(|| DecodeError::NullResult(column.to_string()))?)
}

fn text_to_response(text: &str) -> Result<QueryResponse, Error> {
    Ok(serde_json::from_str(text).map_err(DecodeError::MalformedEngineOutput)?)
}
