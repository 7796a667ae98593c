//! The version 1 configuration file format.

use std::collections::BTreeMap;
use std::path::Path;

use schemars::{gen::SchemaSettings, schema::RootSchema, JsonSchema};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::ParseConfigurationError;
use crate::values::{PoolSettings, QuerySettings, Secret};

pub const CURRENT_VERSION: u32 = 1;
pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";

/// The configuration file as written by the user.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    /// Which version of the configuration format are we using
    pub version: u32,
    /// Pointer to the JSON schema of this file, for editors.
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// The databases requests may select, by the identifier they send.
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseSettings>,
    /// The database used by requests that do not select one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_database: Option<String>,
    #[serde(default, skip_serializing_if = "PoolSettings::is_default")]
    pub pool_settings: PoolSettings,
    #[serde(default, skip_serializing_if = "QuerySettings::is_default")]
    pub query_settings: QuerySettings,
}

/// One allow-listed SQLite database file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSettings {
    /// Path to the database file, relative to the working directory of the connector.
    pub path: Secret,
    #[serde(default = "read_only_default")]
    pub read_only: bool,
    #[serde(default)]
    pub create_if_missing: bool,
}

fn read_only_default() -> bool {
    true
}

impl ParsedConfiguration {
    pub fn empty() -> Self {
        Self {
            version: CURRENT_VERSION,
            schema: Some(CONFIGURATION_JSONSCHEMA_FILENAME.to_string()),
            databases: BTreeMap::new(),
            default_database: None,
            pool_settings: PoolSettings::default(),
            query_settings: QuerySettings::default(),
        }
    }
}

/// Read `configuration.json` from the configuration directory.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);

    let configuration_file_contents = fs::read_to_string(&configuration_file)
        .await
        .map_err(|source| ParseConfigurationError::IoError {
            file_path: configuration_file.clone(),
            source,
        })?;

    let parsed_config: ParsedConfiguration = serde_json::from_str(&configuration_file_contents)
        .map_err(|error| ParseConfigurationError::ParseError {
            file_path: configuration_file.clone(),
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        })?;

    if parsed_config.version != CURRENT_VERSION {
        return Err(ParseConfigurationError::UnsupportedVersion {
            file_path: configuration_file,
            found: parsed_config.version,
            expected: CURRENT_VERSION,
        });
    }

    tracing::debug!(
        databases = ?parsed_config.databases.keys().collect::<Vec<_>>(),
        "parsed configuration"
    );

    Ok(parsed_config)
}

/// The JSON schema of the configuration file.
pub fn configuration_jsonschema() -> RootSchema {
    SchemaSettings::draft07()
        .into_generator()
        .into_root_schema_for::<ParsedConfiguration>()
}
