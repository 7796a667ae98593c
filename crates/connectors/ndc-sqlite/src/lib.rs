//! A data connector agent serving queries over SQLite databases.
//!
//! The routes are defined in `routes`; each handler lives in its own module.

pub mod capabilities;
pub mod error;
pub mod explain;
pub mod health;
pub mod options;
pub mod query;
pub mod routes;
pub mod schema;
pub mod state;
