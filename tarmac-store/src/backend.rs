use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use crate::StoreError;

/// Keyed persistence, one JSON document per entity collection. The engine
/// reads collections once at open and writes a whole collection at the end
/// of each mutating operation.
pub trait StorageBackend: Send + Sync {
    fn load(&self, collection: &str) -> Result<Option<Value>, StoreError>;
    fn save(&self, collection: &str, value: &Value) -> Result<(), StoreError>;
    fn remove(&self, collection: &str) -> Result<(), StoreError>;
}

/// Volatile backend for tests and single-run deployments
#[derive(Default)]
pub struct MemoryBackend {
    data: Mutex<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, collection: &str) -> Result<Option<Value>, StoreError> {
        let data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        Ok(data.get(collection).cloned())
    }

    fn save(&self, collection: &str, value: &Value) -> Result<(), StoreError> {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.insert(collection.to_owned(), value.clone());
        Ok(())
    }

    fn remove(&self, collection: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.remove(collection);
        Ok(())
    }
}

/// One pretty-printed JSON file per collection under a data directory
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self, collection: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path(collection);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, collection: &str, value: &Value) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(collection);
        std::fs::write(&path, serde_json::to_vec_pretty(value)?)?;
        debug!("Persisted collection {} to {}", collection, path.display());
        Ok(())
    }

    fn remove(&self, collection: &str) -> Result<(), StoreError> {
        let path = self.path(collection);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();
        assert!(backend.load("flights").unwrap().is_none());

        backend.save("flights", &json!({"AA1234_1": {"gate": "A12"}})).unwrap();
        let loaded = backend.load("flights").unwrap().unwrap();
        assert_eq!(loaded["AA1234_1"]["gate"], "A12");

        backend.remove("flights").unwrap();
        assert!(backend.load("flights").unwrap().is_none());
    }

    #[test]
    fn test_file_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());

        assert!(backend.load("bags").unwrap().is_none());
        backend.save("bags", &json!({"100001": {"location": "check-in"}})).unwrap();

        // A fresh backend over the same directory observes the committed write
        let reopened = JsonFileBackend::new(dir.path());
        let loaded = reopened.load("bags").unwrap().unwrap();
        assert_eq!(loaded["100001"]["location"], "check-in");

        backend.remove("bags").unwrap();
        assert!(reopened.load("bags").unwrap().is_none());
    }
}
