//! Translate an incoming `QueryRequest`.

pub mod aggregates;
pub mod fields;
pub mod filtering;
pub mod operators;
pub mod relationships;
pub mod root;
pub mod sorting;
pub mod values;

use dc_api_types::QueryRequest;
use ndc_sqlite_configuration::QuerySettings;
use query_engine_sql::sql;

use crate::translation::error::Error;
use crate::translation::helpers::{Env, State};

/// The name of the single column holding the whole response.
pub const RESULT_COLUMN: &str = "data";

/// Translate the incoming QueryRequest to an ExecutionPlan (SQL) to be run against the database.
///
/// The root table is translated like an array relationship without a join, so the statement
/// is `SELECT <array relationship> AS "data"` and returns exactly one row.
pub fn translate(
    settings: &QuerySettings,
    query_request: QueryRequest,
) -> Result<sql::execution_plan::ExecutionPlan<sql::execution_plan::Query>, Error> {
    let env = Env::new(&query_request.table_relationships, settings);
    let mut state = State::new();

    let data = root::translate_array_query(
        &env,
        &mut state,
        0,
        &query_request.table,
        None,
        &query_request.query,
    )?;

    let result_column = sql::helpers::make_column_alias(RESULT_COLUMN.to_string());
    let select = sql::helpers::simple_select(vec![(result_column.clone(), env.tag("query", data))]);

    // log and return
    tracing::debug!("SQL AST: {:?}", select);
    Ok(sql::execution_plan::simple_query_execution_plan(
        query_request.table,
        select,
        result_column,
    ))
}
