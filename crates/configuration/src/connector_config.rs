//! Configuration sent by the engine with every request.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The header carrying the per-request connector configuration as JSON.
pub const CONNECTOR_CONFIG_HEADER: &str = "X-Hasura-DataConnector-Config";

/// Per-request connector configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ConnectorConfig {
    /// Identifier of the database to query. It must be one of the databases the connector
    /// was configured with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    /// Restrict the schema to these tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<String>>,
    /// Include SQLite meta tables in the schema.
    #[serde(default)]
    pub meta: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid {CONNECTOR_CONFIG_HEADER} header: {0}")]
pub struct InvalidConnectorConfig(String);

impl ConnectorConfig {
    /// Parse the header value. An absent header is the default configuration.
    pub fn from_header(value: Option<&[u8]>) -> Result<Self, InvalidConnectorConfig> {
        match value {
            None => Ok(ConnectorConfig::default()),
            Some(bytes) => serde_json::from_slice(bytes)
                .map_err(|err| InvalidConnectorConfig(err.to_string())),
        }
    }
}
