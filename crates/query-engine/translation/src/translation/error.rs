//! Errors for query translation.

/// A request that cannot be compiled. These are the client's fault and are reported
/// before anything is sent to the database.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("relationship '{relationship}' is not defined for table '{source_table}'")]
    UnknownRelationship {
        source_table: String,
        relationship: String,
    },
    #[error("relationship '{relationship}' of table '{source_table}' has an empty column mapping")]
    EmptyColumnMapping {
        source_table: String,
        relationship: String,
    },
    #[error("relationship fields are nested deeper than the limit of {limit}")]
    RelationshipDepthExceeded { limit: u32 },
    #[error("the path to column '{column}' traverses {length} relationships, more than the limit of {limit}")]
    PathTooLong {
        column: String,
        length: usize,
        limit: u32,
    },
    #[error("unsupported operator '{operator}' on column '{column}'")]
    UnsupportedOperator { operator: String, column: String },
    #[error("unsupported aggregate function '{function}' on column '{column}'")]
    UnsupportedAggregateFunction { function: String, column: String },
    #[error("unsupported comparison value {value} for column '{column}'")]
    UnsupportedValue {
        column: String,
        value: serde_json::Value,
    },
    #[error("aggregates are not supported on object relationship '{relationship}'")]
    UnsupportedAggregates { relationship: String },
}
