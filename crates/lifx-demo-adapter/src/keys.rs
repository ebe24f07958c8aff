/*
[INPUT]:  LIFX and Claude API keys entered by the user
[OUTPUT]: Persisted keys and validation verdicts
[POS]:    Credentials layer - user-supplied API keys in the local store
[UPDATE]: When key formats or persistence rules change
*/

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::storage::{CLAUDE_API_KEY, KeyValueStore, LIFX_API_KEY, StorageResult};

/// Shortest LIFX token accepted
pub const MIN_LIFX_KEY_LEN: usize = 20;
/// Prefix of Anthropic API keys
pub const CLAUDE_KEY_PREFIX: &str = "sk-ant-";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyValidationError {
    #[error("LIFX API key is required")]
    LifxMissing,

    #[error("LIFX API key appears to be too short")]
    LifxTooShort,

    #[error("Claude API key is required")]
    ClaudeMissing,

    #[error("Claude API key should start with \"sk-ant-\"")]
    ClaudeBadPrefix,
}

/// The two keys the demo forwards to the backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeys {
    pub lifx: String,
    pub claude: String,
}

impl ApiKeys {
    pub fn new(lifx: impl Into<String>, claude: impl Into<String>) -> Self {
        Self {
            lifx: lifx.into(),
            claude: claude.into(),
        }
    }

    pub fn is_lifx_key_valid(&self) -> bool {
        validate_lifx_api_key(&self.lifx).is_ok()
    }

    pub fn is_claude_key_valid(&self) -> bool {
        validate_claude_api_key(&self.claude).is_ok()
    }

    pub fn are_keys_valid(&self) -> bool {
        self.is_lifx_key_valid() && self.is_claude_key_valid()
    }
}

pub fn validate_lifx_api_key(key: &str) -> Result<(), KeyValidationError> {
    if key.is_empty() {
        return Err(KeyValidationError::LifxMissing);
    }
    if key.chars().count() < MIN_LIFX_KEY_LEN {
        return Err(KeyValidationError::LifxTooShort);
    }
    Ok(())
}

pub fn validate_claude_api_key(key: &str) -> Result<(), KeyValidationError> {
    if key.is_empty() {
        return Err(KeyValidationError::ClaudeMissing);
    }
    if !key.starts_with(CLAUDE_KEY_PREFIX) {
        return Err(KeyValidationError::ClaudeBadPrefix);
    }
    Ok(())
}

/// API keys kept in the durable store
#[derive(Debug, Clone)]
pub struct ApiKeyStore {
    store: Arc<dyn KeyValueStore>,
}

impl ApiKeyStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Missing keys load as empty strings
    pub fn load(&self) -> StorageResult<ApiKeys> {
        Ok(ApiKeys {
            lifx: self.store.get(LIFX_API_KEY)?.unwrap_or_default(),
            claude: self.store.get(CLAUDE_API_KEY)?.unwrap_or_default(),
        })
    }

    /// Persist both keys; an empty key is removed instead of stored
    pub fn save(&self, keys: &ApiKeys) -> StorageResult<()> {
        self.put(LIFX_API_KEY, &keys.lifx)?;
        self.put(CLAUDE_API_KEY, &keys.claude)?;
        info!(
            lifx_set = !keys.lifx.is_empty(),
            claude_set = !keys.claude.is_empty(),
            "api keys saved"
        );
        Ok(())
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(LIFX_API_KEY)?;
        self.store.remove(CLAUDE_API_KEY)?;
        info!("api keys cleared");
        Ok(())
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        if value.is_empty() {
            self.store.remove(key)
        } else {
            self.store.set(key, value)
        }
    }
}

/// `sk-ant-abc…` style preview that never prints the whole secret
pub fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = key.chars().take(7).collect();
    if key.chars().count() <= 7 {
        "*".repeat(key.chars().count())
    } else {
        format!("{visible}…")
    }
}
