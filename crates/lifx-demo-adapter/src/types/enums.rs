/*
[INPUT]:  Backend status vocabulary and log source names
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When new statuses or log sources are added
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reachability of the backend as seen by the last health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Checking,
    Connected,
    Error,
    Disconnected,
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Checking => f.write_str("checking"),
            BackendStatus::Connected => f.write_str("connected"),
            BackendStatus::Error => f.write_str("error"),
            BackendStatus::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// Availability of a log endpoint after the last fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStatus {
    #[default]
    Unknown,
    Available,
    Unavailable,
    Error,
}

impl fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointStatus::Unknown => f.write_str("unknown"),
            EndpointStatus::Available => f.write_str("available"),
            EndpointStatus::Unavailable => f.write_str("unavailable"),
            EndpointStatus::Error => f.write_str("error"),
        }
    }
}

/// Server that produced a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    Backend,
    Mcp,
}

impl LogSource {
    /// Path of the log endpoint for this source
    pub fn endpoint(self) -> &'static str {
        match self {
            LogSource::Backend => "/api/logs/backend",
            LogSource::Mcp => "/api/logs/mcp",
        }
    }

    /// Default `limit` query value for this source
    pub fn default_limit(self) -> u32 {
        match self {
            LogSource::Backend => 25,
            LogSource::Mcp => 20,
        }
    }

    /// Bracketed prefix used in display and export text
    pub fn tag(self) -> &'static str {
        match self {
            LogSource::Backend => "[BACKEND]",
            LogSource::Mcp => "[MCP]",
        }
    }

    /// Human readable name used in log lines and messages
    pub fn label(self) -> &'static str {
        match self {
            LogSource::Backend => "Backend",
            LogSource::Mcp => "MCP",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::Backend => f.write_str("backend"),
            LogSource::Mcp => f.write_str("mcp"),
        }
    }
}

/// Selection for plain-text export and clipboard copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogExportSource {
    #[default]
    All,
    Backend,
    Mcp,
}

impl fmt::Display for LogExportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogExportSource::All => f.write_str("all"),
            LogExportSource::Backend => f.write_str("backend"),
            LogExportSource::Mcp => f.write_str("mcp"),
        }
    }
}

/// Who triggered a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheckSource {
    /// First check at start-up; runs at most once per client
    Initial,
    /// Explicit user request
    Manual,
    /// Timer driven re-check
    Periodic,
}
