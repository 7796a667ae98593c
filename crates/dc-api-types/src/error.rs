use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Body of every non-success response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: ErrorResponseType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorResponseType {
    InvalidRequest,
    PermissionDenied,
    UncaughtError,
}
