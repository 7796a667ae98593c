//! `/capabilities` endpoint for the connector.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use dc_api_types as api;
use ndc_sqlite_configuration::ConnectorConfig;
use query_engine_metadata::metadata;

/// Get the connector's capabilities.
pub fn get_capabilities() -> api::CapabilitiesResponse {
    api::CapabilitiesResponse {
        capabilities: api::Capabilities {
            queries: api::QueryCapabilities {},
            relationships: api::RelationshipCapabilities {},
            comparisons: api::ComparisonCapabilities {
                subquery: api::SubqueryComparisonCapabilities {
                    supports_relations: true,
                },
            },
            explain: api::ExplainCapabilities {},
            metrics: api::MetricsCapabilities {},
            scalar_types: scalar_types(),
        },
        config_schemas: config_schemas(),
        display_name: Some("SQLite".to_string()),
    }
}

/// Each scalar type with the single column aggregate functions it supports. Comparison
/// operators beyond the built-in ones are not offered.
fn scalar_types() -> IndexMap<api::ScalarTypeName, api::ScalarTypeCapabilities> {
    enum_iterator::all::<metadata::ScalarType>()
        .map(|scalar_type| {
            let aggregate_functions = scalar_type
                .aggregate_functions()
                .into_iter()
                .map(|(function, result_type)| {
                    (function.to_string(), result_type.name().to_string())
                })
                .collect();
            (
                scalar_type.name().to_string(),
                api::ScalarTypeCapabilities {
                    aggregate_functions,
                    comparison_operators: IndexMap::new(),
                },
            )
        })
        .collect()
}

/// The JSON schema of the connector config header.
fn config_schemas() -> api::ConfigSchemaResponse {
    let root = schemars::schema_for!(ConnectorConfig);
    api::ConfigSchemaResponse {
        config_schema: root.schema,
        other_schemas: root.definitions.into_iter().collect::<BTreeMap<_, _>>(),
    }
}
