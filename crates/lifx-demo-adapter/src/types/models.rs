/*
[INPUT]:  Log records and usage headers from the demo backend
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fallback for `requests_remaining` and `daily_limit` when the server omits them
pub const DEFAULT_DAILY_LIMIT: i64 = 100;

/// One server log record.
///
/// Fields other than the four known ones (`output`, `pid`, `logType`, ...)
/// are kept in `extra` so MCP payloads survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogEntry {
    pub fn new(
        timestamp: impl Into<String>,
        level: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            level: level.into(),
            message: message.into(),
            meta: None,
            extra: Map::new(),
        }
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The record as a JSON object, as the server sent it
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("timestamp".to_string(), Value::String(self.timestamp.clone()));
        object.insert("level".to_string(), Value::String(self.level.clone()));
        object.insert("message".to_string(), Value::String(self.message.clone()));
        if let Some(meta) = &self.meta {
            object.insert("meta".to_string(), meta.clone());
        }
        for (key, value) in &self.extra {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

/// Request counters reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    pub used: i64,
    pub remaining: i64,
    pub limit: i64,
}

impl Default for UsageCounters {
    fn default() -> Self {
        Self {
            used: 0,
            remaining: DEFAULT_DAILY_LIMIT,
            limit: DEFAULT_DAILY_LIMIT,
        }
    }
}

impl UsageCounters {
    /// Share of the daily limit already consumed, rounded to a whole percent
    pub fn percentage(&self) -> i64 {
        if self.limit == 0 {
            return 0;
        }
        ((self.used as f64 / self.limit as f64) * 100.0).round() as i64
    }
}
