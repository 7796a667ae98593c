//! Common functions used across test cases.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test_helper::TestClient;

use ndc_sqlite::{routes, state};
use ndc_sqlite_configuration::{
    Configuration, DatabaseConnectionSettings, PoolSettings, QuerySettings,
    CONNECTOR_CONFIG_HEADER,
};
use tests_common::fixtures::FixtureDatabase;

/// A configuration allow-listing the given fixtures, opened read-only.
pub fn configuration(databases: &[(&str, &FixtureDatabase)]) -> Configuration {
    Configuration {
        databases: databases
            .iter()
            .map(|(name, database)| {
                (
                    (*name).to_string(),
                    DatabaseConnectionSettings {
                        path: database.path.clone(),
                        read_only: true,
                        create_if_missing: false,
                    },
                )
            })
            .collect::<BTreeMap<_, _>>(),
        default_database: None,
        pool_settings: PoolSettings::default(),
        query_settings: QuerySettings::default(),
    }
}

/// Creates a client for a router with a fresh state.
pub async fn create_client(configuration: Configuration) -> TestClient {
    let state = state::create_state(configuration).await.unwrap();
    TestClient::new(routes::create_router(Arc::new(state), true))
}

/// The connector config header selecting a database.
pub fn select(database: &str) -> String {
    serde_json::json!({ "db": database }).to_string()
}

/// Run an action against the server and return the status with the JSON body.
pub async fn post(
    client: &TestClient,
    action: &str,
    connector_config: Option<&str>,
    request: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut builder = client
        .post(&format!("/{action}"))
        .body(request.to_string())
        .header("Content-Type", "application/json");
    if let Some(connector_config) = connector_config {
        builder = builder.header(CONNECTOR_CONFIG_HEADER, connector_config);
    }
    let res = builder.send().await;
    (res.status(), res.json().await)
}

/// Get a route and return the status with the body text.
pub async fn get(
    client: &TestClient,
    path: &str,
    connector_config: Option<&str>,
) -> (StatusCode, String) {
    let mut builder = client.get(path);
    if let Some(connector_config) = connector_config {
        builder = builder.header(CONNECTOR_CONFIG_HEADER, connector_config);
    }
    let res = builder.send().await;
    (res.status(), res.text().await)
}

pub fn artist_names_request() -> serde_json::Value {
    serde_json::json!({
        "table": "Artist",
        "table_relationships": [],
        "query": {
            "fields": { "name": { "type": "column", "column": "Name" } },
            "order_by": [{ "column": "ArtistId", "direction": "asc" }],
            "limit": 2
        }
    })
}
