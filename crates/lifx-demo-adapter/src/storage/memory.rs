/*
[INPUT]:  Key/value pairs from session and key tracking
[OUTPUT]: In-process storage that is lost on exit
[POS]:    Storage layer - volatile KeyValueStore implementation
[UPDATE]: When the KeyValueStore trait changes
*/

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{KeyValueStore, StorageResult};

/// Volatile store, the default for tests and one-shot runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        guard.remove(key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        guard.clear();
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.keys().cloned().collect())
    }
}
