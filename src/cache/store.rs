// Storage backends for the cache tiers
//
// Tier storage is string-keyed JSON blobs. The session tier lives in memory
// (its lifetime is the dashboard session), the persistent tier on disk. Tests
// swap in a memory store for both so they run hermetically.

use crate::core::{ DashError, DashResult };
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;

/// String-keyed blob storage consumed by the cache tiers and the preference
/// store. Reads are infallible by design: a backend that cannot produce a
/// value reports a miss, never an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> DashResult<()>;
    fn remove(&self, key: &str);
}

/// In-memory storage, used for the session tier and for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> DashResult<()> {
        self.data.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.data.lock().remove(key);
    }
}

/// File-backed storage: one JSON file per key inside a directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store rooted at the standard data directory
    pub fn at_data_dir() -> Self {
        Self::new(crate::paths::get_data_directory())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> DashResult<()> {
        std::fs
            ::write(self.path_for(key), value)
            .map_err(|e| DashError::Storage(format!("write {}: {}", key, e)))
    }

    fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.path_for(key));
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k"), Some("v".to_string()));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert_eq!(store.get("dashboard.stats"), None);
        store.set("dashboard.stats", r#"{"a":1}"#).unwrap();
        assert_eq!(store.get("dashboard.stats"), Some(r#"{"a":1}"#.to_string()));
        store.remove("dashboard.stats");
        assert_eq!(store.get("dashboard.stats"), None);
    }

    #[test]
    fn test_file_store_write_to_missing_dir_errors() {
        let store = FileStore::new(PathBuf::from("/nonexistent/streamdash-test"));
        assert!(store.set("k", "v").is_err());
        // Reads from a broken backend are a miss, not an error
        assert_eq!(store.get("k"), None);
    }
}
