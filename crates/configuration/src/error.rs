//! Errors that can be thrown when processing configuration.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("unsupported configuration version {found} in {file_path}; expected {expected}")]
    UnsupportedVersion {
        file_path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("could not read {file_path}: {source}")]
    IoError {
        file_path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("invalid configuration for database '{database}': {source}")]
    MissingEnvironmentVariable {
        database: String,
        source: crate::environment::Error,
    },
    #[error("the default database '{0}' is not one of the configured databases")]
    UnknownDefaultDatabase(String),
    #[error("invalid query settings: {0}")]
    InvalidQuerySettings(String),
}
