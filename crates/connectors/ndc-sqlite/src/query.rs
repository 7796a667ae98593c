//! Implement the `/query` endpoint to run a query against SQLite.

use tracing::{info_span, Instrument};

use dc_api_types::{QueryRequest, QueryResponse};
use ndc_sqlite_configuration::ConnectorConfig;
use query_engine_execution::query as execution;
use query_engine_translation::translation;

use crate::error::ServerError;
use crate::state::State;

/// Execute a query
///
/// The request is compiled before a database is touched, so a malformed request never
/// reaches SQLite.
pub async fn query(
    state: &State,
    connector_config: &ConnectorConfig,
    query_request: QueryRequest,
) -> Result<QueryResponse, ServerError> {
    tracing::debug!(table = query_request.table, "query request");

    // Compile the query.
    let plan = async {
        translation::query::translate(&state.configuration.query_settings, query_request)
    }
    .instrument(info_span!("Plan query"))
    .await?;

    let pool = state.require_pool(connector_config.db.as_deref()).await?;

    // Execute the query.
    let result = execution::execute(&pool, &plan, state.statement_timeout())
        .instrument(info_span!("Execute query"))
        .await?;

    // assuming query succeeded, increment counter
    state.metrics.query_total.inc();

    Ok(result)
}
