//! Health check endpoint for the connector.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use ndc_sqlite_configuration::ConnectorConfig;
use query_engine_execution::query as execution;

use crate::error::ServerError;
use crate::state::State;

/// Check the health of the connector.
///
/// Without a database this only shows the agent is up. With one, it checks that SQLite
/// answers a trivial statement.
pub async fn health_check(
    state: &State,
    connector_config: &ConnectorConfig,
) -> Result<Response, ServerError> {
    let Some(pool) = state.select_pool(connector_config.db.as_deref()).await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    match execution::check_health(&pool).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT.into_response()),
        Ok(false) => Ok(unhealthy()),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            Ok(unhealthy())
        }
    }
}

fn unhealthy() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "problem executing query" })),
    )
        .into_response()
}
