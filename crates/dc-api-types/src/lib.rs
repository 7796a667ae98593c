//! Request and response types of the data connector API.
//!
//! These mirror the JSON documents exchanged with the engine: query requests with their
//! relationship and filter trees, query responses, schema, capabilities and explain documents.

pub mod capabilities;
pub mod error;
pub mod explain;
pub mod query;
pub mod response;
pub mod schema;

pub use capabilities::*;
pub use error::*;
pub use explain::*;
pub use query::*;
pub use response::*;
pub use schema::*;
