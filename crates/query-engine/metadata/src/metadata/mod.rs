//! Metadata information regarding the database and tracked information.

pub mod database;
pub mod introspection;

// re-export without modules
pub use database::*;
