/*
[INPUT]:  Store file path and key/value mutations
[OUTPUT]: JSON object file mirroring the in-memory map
[POS]:    Storage layer - durable store for API keys, config and session id
[UPDATE]: When file format or permission handling changes
*/

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;

use super::{KeyValueStore, StorageError, StorageResult};

/// Key/value store persisted as a single JSON object.
///
/// The whole map is rewritten on every mutation via a temp file in the same
/// directory, so readers never observe a half-written file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = Self::load(&path)?;
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> StorageResult<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            StorageError::DataCorruption(format!("{}: {e}", path.display()))
        })
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> StorageResult<()> {
        let parent = self.path.parent().ok_or_else(|| {
            StorageError::DataCorruption("Invalid parent directory".to_string())
        })?;
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let mut temp_file = NamedTempFile::new_in(parent)?;
        let json_str = serde_json::to_string_pretty(data)?;
        temp_file.write_all(json_str.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(&self.path)?;

        restrict_permissions(&self.path)?;
        Ok(())
    }

    fn mutate(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> StorageResult<()> {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
        self.persist(&guard)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> StorageResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> StorageResult<()> {
    Ok(())
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.mutate(|data| {
            data.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.mutate(|data| {
            data.remove(key);
        })
    }

    fn clear(&self) -> StorageResult<()> {
        self.mutate(|data| data.clear())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set("demo_key", "LifxDemo").unwrap();
        store.set("demo_backend_url", "http://localhost:3001").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("demo_key").unwrap(), Some("LifxDemo".to_string()));
        assert_eq!(reopened.keys().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("absent.json")).unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::DataCorruption(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions_are_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.set("lifx_api_key", "secret").unwrap();

        let metadata = fs::metadata(&path).unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn test_clear_rewrites_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.set("a", "1").unwrap();
        store.clear().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.keys().unwrap().is_empty());
    }
}
