//! The capabilities document.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::ScalarTypeName;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitiesResponse {
    pub capabilities: Capabilities,
    pub config_schemas: ConfigSchemaResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub queries: QueryCapabilities,
    pub relationships: RelationshipCapabilities,
    pub comparisons: ComparisonCapabilities,
    pub explain: ExplainCapabilities,
    pub metrics: MetricsCapabilities,
    pub scalar_types: IndexMap<ScalarTypeName, ScalarTypeCapabilities>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryCapabilities {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipCapabilities {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonCapabilities {
    pub subquery: SubqueryComparisonCapabilities,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubqueryComparisonCapabilities {
    pub supports_relations: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplainCapabilities {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsCapabilities {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalarTypeCapabilities {
    /// Aggregate function name to the scalar type of its result.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub aggregate_functions: IndexMap<String, ScalarTypeName>,
    /// Comparison operator name to the scalar type of its argument.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub comparison_operators: IndexMap<String, ScalarTypeName>,
}

/// JSON schema of the per-request connector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSchemaResponse {
    pub config_schema: schemars::schema::SchemaObject,
    pub other_schemas: BTreeMap<String, schemars::schema::Schema>,
}
