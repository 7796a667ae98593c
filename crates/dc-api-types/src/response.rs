//! The decoded result of a query.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::query::FieldName;

/// One projected row. Relationship fields hold nested JSON documents.
pub type Row = IndexMap<FieldName, serde_json::Value>;

/// A query without aggregates yields a bare array of rows; one with aggregates yields a
/// `rows`/`aggregates` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum QueryResponse {
    Rows(Vec<Row>),
    RowSet(RowSet),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RowSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<IndexMap<FieldName, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Row>>,
}

impl QueryResponse {
    /// The rows of the response, wherever they sit.
    pub fn rows(&self) -> Option<&Vec<Row>> {
        match self {
            QueryResponse::Rows(rows) => Some(rows),
            QueryResponse::RowSet(RowSet { rows, .. }) => rows.as_ref(),
        }
    }
}
