use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The compiled statement of a query, with the engine's plan for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExplainResponse {
    pub lines: Vec<String>,
    pub query: String,
}
