//! The schema document.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::query::{ColumnName, TableName};

/// Name of a scalar type as it appears in the schema and capabilities, e.g. `number`.
pub type ScalarTypeName = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaResponse {
    pub tables: Vec<TableInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableInfo {
    pub name: TableName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_key: Vec<ColumnName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnInfo {
    pub name: ColumnName,
    #[serde(rename = "type")]
    pub r#type: ScalarTypeName,
    pub nullable: bool,
}
