use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for compiling and running queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuerySettings {
    /// Surround each compiled fragment with comments naming the rule that produced it.
    #[serde(default)]
    pub debug_tags: bool,
    /// How deeply relationship fields may nest.
    #[serde(default = "max_relationship_depth_default")]
    pub max_relationship_depth: u32,
    /// How many relationships a filter column may traverse.
    #[serde(default = "max_path_length_default")]
    pub max_path_length: u32,
    /// Abort a statement that runs longer than this (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl QuerySettings {
    pub fn is_default(&self) -> bool {
        self == &QuerySettings::default()
    }
}

impl Default for QuerySettings {
    fn default() -> QuerySettings {
        QuerySettings {
            debug_tags: false,
            max_relationship_depth: max_relationship_depth_default(),
            max_path_length: max_path_length_default(),
            timeout_seconds: None,
        }
    }
}

fn max_relationship_depth_default() -> u32 {
    16
}

fn max_path_length_default() -> u32 {
    16
}
