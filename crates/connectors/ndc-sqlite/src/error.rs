//! Errors surfaced by the HTTP routes, and their mapping to responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use dc_api_types::{ErrorResponse, ErrorResponseType};
use ndc_sqlite_configuration::connector_config::InvalidConnectorConfig;
use query_engine_execution::error as execution;
use query_engine_metadata::metadata::introspection;
use query_engine_translation::translation::error as translation;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0}")]
    Compile(#[from] translation::Error),
    #[error("{0}")]
    InvalidConnectorConfig(#[from] InvalidConnectorConfig),
    #[error("{0}")]
    MalformedRequest(#[from] JsonRejection),
    #[error("no database was selected and no default database is configured")]
    MissingDatabase,
    #[error("the database '{0}' is not available to this connector")]
    PermissionDenied(String),
    #[error("{0}")]
    Execution(#[from] execution::Error),
    #[error("{0}")]
    Introspection(#[from] introspection::Error),
    #[error("{0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Metrics(#[from] prometheus::Error),
}

impl ServerError {
    fn status_and_type(&self) -> (StatusCode, ErrorResponseType) {
        match self {
            ServerError::Compile(_)
            | ServerError::InvalidConnectorConfig(_)
            | ServerError::MalformedRequest(_)
            | ServerError::MissingDatabase => {
                (StatusCode::BAD_REQUEST, ErrorResponseType::InvalidRequest)
            }
            ServerError::PermissionDenied(_) => {
                (StatusCode::FORBIDDEN, ErrorResponseType::PermissionDenied)
            }
            ServerError::Execution(_)
            | ServerError::Introspection(_)
            | ServerError::Database(_)
            | ServerError::Metrics(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponseType::UncaughtError,
            ),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();
        // engine failures are only described in the server log
        let message = if status.is_server_error() {
            "internal error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorResponse {
            error_type,
            message,
            details: None,
        };
        (status, Json(body)).into_response()
    }
}

/// Log an error in the connector's structured form. Client errors are warnings.
pub fn log_error(event_name: &'static str, err: &ServerError) {
    if err.status_and_type().0.is_server_error() {
        tracing::error!(
            meta.signal_type = "log",
            event.domain = "ndc",
            event.name = event_name,
            name = event_name,
            body = %err,
            error = true,
        );
    } else {
        tracing::warn!(
            meta.signal_type = "log",
            event.domain = "ndc",
            event.name = event_name,
            name = event_name,
            body = %err,
        );
    }
}
