//! The HTTP routes of the agent.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, Method};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use dc_api_types as api;
use ndc_sqlite_configuration::{ConnectorConfig, CONNECTOR_CONFIG_HEADER};

use crate::error::{log_error, ServerError};
use crate::state;
use crate::{capabilities, explain, health, query, schema};

const SOURCE_NAME_HEADER: &str = "x-hasura-dataconnector-sourcename";

/// Build the router serving every endpoint of the agent.
pub fn create_router(state: Arc<state::State>, permissive_cors: bool) -> Router {
    let router = Router::new()
        .route("/capabilities", get(get_capabilities))
        .route("/schema", get(get_schema))
        .route("/query", post(post_query))
        .route("/query/explain", post(post_explain))
        .route("/health", get(get_health))
        .route("/metrics", get(get_metrics))
        .with_state(state);

    if permissive_cors {
        router.layer(cors_layer())
    } else {
        router
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("x-hasura-dataconnector-config"),
            HeaderName::from_static(SOURCE_NAME_HEADER),
        ])
}

fn connector_config(headers: &HeaderMap) -> Result<ConnectorConfig, ServerError> {
    let value = headers
        .get(CONNECTOR_CONFIG_HEADER)
        .map(axum::http::HeaderValue::as_bytes);
    Ok(ConnectorConfig::from_header(value)?)
}

/// The connector config and body of a query or explain request.
fn query_request(
    headers: &HeaderMap,
    payload: Result<Json<api::QueryRequest>, JsonRejection>,
) -> Result<(ConnectorConfig, api::QueryRequest), ServerError> {
    let config = connector_config(headers)?;
    let Json(request) = payload?;
    Ok((config, request))
}

async fn get_capabilities() -> Json<api::CapabilitiesResponse> {
    Json(capabilities::get_capabilities())
}

async fn get_schema(
    State(state): State<Arc<state::State>>,
    headers: HeaderMap,
) -> Result<Json<api::SchemaResponse>, ServerError> {
    let result = match connector_config(&headers) {
        Ok(config) => schema::get_schema(&state, &config).await,
        Err(err) => Err(err),
    };
    result.map(Json).map_err(|err| {
        log_error("Schema error", &err);
        err
    })
}

async fn post_query(
    State(state): State<Arc<state::State>>,
    headers: HeaderMap,
    payload: Result<Json<api::QueryRequest>, JsonRejection>,
) -> Result<Json<api::QueryResponse>, ServerError> {
    let result = match query_request(&headers, payload) {
        Ok((config, request)) => query::query(&state, &config, request).await,
        Err(err) => Err(err),
    };
    state.update_pool_metrics().await;
    result.map(Json).map_err(|err| {
        log_error("Query error", &err);
        state.metrics.query_errors_total.inc();
        err
    })
}

async fn post_explain(
    State(state): State<Arc<state::State>>,
    headers: HeaderMap,
    payload: Result<Json<api::QueryRequest>, JsonRejection>,
) -> Result<Json<api::ExplainResponse>, ServerError> {
    let result = match query_request(&headers, payload) {
        Ok((config, request)) => explain::explain(&state, &config, request).await,
        Err(err) => Err(err),
    };
    state.update_pool_metrics().await;
    result.map(Json).map_err(|err| {
        log_error("Explain error", &err);
        state.metrics.query_errors_total.inc();
        err
    })
}

async fn get_health(
    State(state): State<Arc<state::State>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let config = connector_config(&headers)?;
    health::health_check(&state, &config).await
}

async fn get_metrics(State(state): State<Arc<state::State>>) -> Result<String, ServerError> {
    state.update_pool_metrics().await;
    let encoder = prometheus::TextEncoder::new();
    Ok(encoder.encode_to_string(&state.metrics_registry.gather())?)
}
