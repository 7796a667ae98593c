//! Errors for query execution.

use std::time::Duration;

/// Everything that can go wrong once a statement has been compiled.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    DB(#[from] sqlx::Error),
    #[error("the statement did not complete within {} ms", .0.as_millis())]
    Timeout(Duration),
    #[error("{0}")]
    Decode(#[from] DecodeError),
}

/// The engine produced something other than the single JSON row the statement was built for.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("the statement returned no rows")]
    NoRows,
    #[error("the statement returned {0} rows, expected one")]
    TooManyRows(usize),
    #[error("the result column '{0}' is null")]
    NullResult(String),
    #[error("malformed engine output: {0}")]
    MalformedEngineOutput(serde_json::Error),
}
