//! Implement the `/query/explain` endpoint to show how SQLite would run a query.

use tracing::{info_span, Instrument};

use dc_api_types::{ExplainResponse, QueryRequest};
use ndc_sqlite_configuration::ConnectorConfig;
use query_engine_execution::query as execution;
use query_engine_translation::translation;

use crate::error::ServerError;
use crate::state::State;

/// Explain a query by creating an execution plan.
pub async fn explain(
    state: &State,
    connector_config: &ConnectorConfig,
    query_request: QueryRequest,
) -> Result<ExplainResponse, ServerError> {
    // Compile the query.
    let plan = async {
        translation::query::translate(&state.configuration.query_settings, query_request)
    }
    .instrument(info_span!("Plan query"))
    .await?;

    let pool = state.require_pool(connector_config.db.as_deref()).await?;

    // Explain the query.
    let (query, lines) = execution::explain(&pool, &plan, state.statement_timeout())
        .instrument(info_span!("Explain query"))
        .await?;

    state.metrics.explain_total.inc();

    Ok(ExplainResponse { lines, query })
}
