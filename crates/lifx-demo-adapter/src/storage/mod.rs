/*
[INPUT]:  String keys and values from the session tracker, config and key stores
[OUTPUT]: Durable ("local") and per-session key/value storage
[POS]:    Storage layer - replaces browser localStorage/sessionStorage
[UPDATE]: When adding storage backends or persisted keys
*/

pub mod file;
pub mod memory;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Key holding the LIFX cloud API key (local store)
pub const LIFX_API_KEY: &str = "lifx_api_key";
/// Key holding the Claude API key (local store)
pub const CLAUDE_API_KEY: &str = "claude_api_key";
/// Key holding the demo session id (session store)
pub const SESSION_ID_KEY: &str = "demo_session_id";
/// Key holding the configured backend URL (local store)
pub const BACKEND_URL_KEY: &str = "demo_backend_url";
/// Key holding the configured demo key (local store)
pub const DEMO_KEY_KEY: &str = "demo_key";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Temporary file error: {0}")]
    TempFile(#[from] tempfile::PersistError),

    #[error("Data corruption: {0}")]
    DataCorruption(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// String key/value store with interior mutability
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
    fn clear(&self) -> StorageResult<()>;
    fn keys(&self) -> StorageResult<Vec<String>>;
}

/// The pair of stores a client instance works against.
///
/// `local` outlives sessions (config, API keys); `session` holds the
/// session id and is expected to be discarded with the session.
#[derive(Debug, Clone)]
pub struct BrowserState {
    pub local: Arc<dyn KeyValueStore>,
    pub session: Arc<dyn KeyValueStore>,
}

impl BrowserState {
    pub fn new(local: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { local, session }
    }

    /// Two fresh in-memory stores
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// File-backed stores at `dir/local.json` and `dir/session.json`
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let local = JsonFileStore::open(dir.join("local.json"))?;
        let session = JsonFileStore::open(dir.join("session.json"))?;
        Ok(Self::new(Arc::new(local), Arc::new(session)))
    }

    /// Wipe every key in both stores
    pub fn clear_all(&self) -> StorageResult<()> {
        self.local.clear()?;
        self.session.clear()
    }
}
