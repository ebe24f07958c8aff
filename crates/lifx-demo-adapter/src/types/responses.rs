/*
[INPUT]:  JSON bodies returned by the demo backend
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Deserializer, Serialize};

use super::models::LogEntry;

/// Body of `GET /api/logs/backend` and `GET /api/logs/mcp`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogsResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<LogEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogsResponse {
    /// Successful, empty result used when an endpoint is not implemented
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self {
            success: true,
            logs: Vec::new(),
            count: 0,
            message: Some(message.into()),
            error: None,
        }
    }
}

/// Reads an explicit `null` the same way as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error body the backend attaches to HTTP 429 responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitBody {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
