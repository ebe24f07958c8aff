/*
[INPUT]:  Error sources (HTTP, API status, rate limiting, storage, clipboard)
[OUTPUT]: Structured error types with classification helpers
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::storage::StorageError;

/// Server code for an exhausted per-session quota
pub const SESSION_LIMIT_CODE: &str = "SESSION_LIMIT";
/// Server code for several live sessions from one address
pub const MULTIPLE_SESSIONS_CODE: &str = "MULTIPLE_SESSIONS";

/// Main error type for the demo client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: connect, timeout, body read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Request failed with status code {status}")]
    Status {
        status: u16,
        body: serde_json::Value,
    },

    /// HTTP 429 with code `SESSION_LIMIT`
    #[error("Session request limit reached. Please try again later.")]
    SessionLimit,

    /// HTTP 429 with code `MULTIPLE_SESSIONS`; callers recover with a session reset
    #[error("Multiple sessions detected from your IP. Please close other tabs.")]
    MultipleSessions,

    /// Log endpoint answered but reported `success: false`
    #[error("{0}")]
    LogsUnavailable(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Persisted state could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Clipboard unavailable or write rejected
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Create a status error from a response status and decoded body
    pub fn status(status: StatusCode, body: serde_json::Value) -> Self {
        ClientError::Status {
            status: status.as_u16(),
            body,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            ClientError::SessionLimit | ClientError::MultipleSessions => Some(429),
            _ => None,
        }
    }

    /// Endpoint does not exist on this server
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// The sentinel a caller answers with `make_api_request_with_session_reset`
    pub fn is_multiple_sessions(&self) -> bool {
        matches!(self, ClientError::MultipleSessions)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code() == Some(429)
    }

    /// Check if the error is a transport timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Http(err) if err.is_timeout())
    }

    /// Map a 429 body onto the domain errors; `None` for unknown codes
    pub fn from_rate_limit_code(code: &str) -> Option<Self> {
        match code {
            SESSION_LIMIT_CODE => Some(ClientError::SessionLimit),
            MULTIPLE_SESSIONS_CODE => Some(ClientError::MultipleSessions),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
