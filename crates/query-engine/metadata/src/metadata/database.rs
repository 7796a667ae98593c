//! Metadata information regarding the database and tracked information.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The scalar types the connector reports. SQLite's declared column types are folded into these.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
    JsonSchema,
    enum_iterator::Sequence,
)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Number,
    Bool,
}

impl ScalarType {
    /// The name of the scalar type as it appears in schema and capabilities responses.
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Number => "number",
            ScalarType::Bool => "bool",
        }
    }

    /// Single column aggregate functions supported on columns of this type,
    /// with the type each one returns.
    pub fn aggregate_functions(self) -> Vec<(&'static str, ScalarType)> {
        match self {
            ScalarType::Number => vec![
                ("avg", ScalarType::Number),
                ("max", ScalarType::Number),
                ("min", ScalarType::Number),
                ("sum", ScalarType::Number),
            ],
            ScalarType::String => vec![("max", ScalarType::String), ("min", ScalarType::String)],
            ScalarType::Bool => vec![],
        }
    }

    /// Map a declared SQLite column type (`NVARCHAR(160)`, `INTEGER`, ...) to a scalar type.
    /// Returns `None` for declarations we do not recognise.
    pub fn from_declared_type(declared: &str) -> Option<ScalarType> {
        let lowercase = declared.to_lowercase();
        let base = lowercase
            .split_once('(')
            .map_or(lowercase.as_str(), |(base, _)| base)
            .trim();

        match base {
            "bool" | "boolean" => Some(ScalarType::Bool),
            "number" | "numeric" | "integer" | "int" | "bigint" | "smallint" | "tinyint"
            | "double" | "double precision" | "float" | "real" | "decimal" => {
                Some(ScalarType::Number)
            }
            "string" | "text" | "char" | "varchar" | "nvarchar" | "nchar" | "character"
            | "clob" => Some(ScalarType::String),
            _ => None,
        }
    }
}

/// Information about a table, as reported by the schema endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct TableInfo {
    pub name: String,
    pub primary_key: Vec<String>,
    pub description: Option<String>,
    pub columns: Vec<ColumnInfo>,
}

/// Information about a single column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ColumnInfo {
    pub name: String,
    pub r#type: ScalarType,
    pub nullable: bool,
}
