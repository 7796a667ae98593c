//! Query execution against a SQLite database.

pub mod error;
pub mod metrics;
pub mod query;
