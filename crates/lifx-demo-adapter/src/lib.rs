/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public LIFX demo client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod clipboard;
pub mod format;
pub mod http;
pub mod keys;
pub mod logs;
pub mod session;
pub mod storage;
pub mod types;

pub use clipboard::{ClipboardService, MemoryClipboard, SystemClipboard};

// Re-export commonly used types from http
pub use http::{
    ApiResponse,
    BackendClient,
    BackendConfig,
    ClientConfig,
    ClientError,
    Method,
    Result,
};

pub use keys::{ApiKeyStore, ApiKeys, KeyValidationError};

pub use logs::{AllLogsOptions, AllLogsResult, CombinedLogEntry, FetchOptions, ServerLogs};

pub use session::{HeaderLookup, SessionNotifier, SessionTracker};

pub use storage::{BrowserState, JsonFileStore, KeyValueStore, MemoryStore, StorageError};

// Re-export all types
pub use types::*;
