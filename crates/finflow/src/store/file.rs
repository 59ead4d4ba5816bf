//! File-backed store: the whole key space as one JSON object on disk, so
//! state survives process restarts the way browser storage survives reloads.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::StoreError;

use super::KeyValueStore;

pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl FileStore {
    /// Opens (or creates) the store file at `path`. A missing file is an
    /// empty store; a malformed file is logged and treated as empty rather
    /// than surfaced as an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteFile {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, Value>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!(
                        "store file '{}' is malformed ({}), starting empty",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        log::info!("Store opened at {}", path.display());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Writes the full map to a sibling temp file, then renames it into
    /// place. Rename is atomic on the same filesystem, so readers never see
    /// a half-written store.
    fn flush(&self, entries: &HashMap<String, Value>) -> Result<(), StoreError> {
        let serialized = serde_json::to_vec_pretty(entries).map_err(StoreError::Serialize)?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut tmp = std::fs::File::create(&tmp_path).map_err(|e| StoreError::WriteFile {
            path: tmp_path.clone(),
            source: e,
        })?;
        tmp.write_all(&serialized).map_err(|e| StoreError::WriteFile {
            path: tmp_path.clone(),
            source: e,
        })?;
        drop(tmp);

        std::fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => {
                log::warn!("store lock poisoned reading '{}', treating as absent", key);
                None
            }
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
        let previous = entries.insert(key.to_string(), value);

        if let Err(e) = self.flush(&entries) {
            // Roll back the cache so memory and disk stay consistent.
            match previous {
                Some(old) => {
                    entries.insert(key.to_string(), old);
                }
                None => {
                    entries.remove(key);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> bool {
        let Ok(mut entries) = self.entries.lock() else {
            return false;
        };
        let Some(previous) = entries.remove(key) else {
            return false;
        };

        if let Err(e) = self.flush(&entries) {
            log::warn!("failed to persist removal of '{}': {}", key, e);
            entries.insert(key.to_string(), previous);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.get("userData").is_none());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set("userData", json!({"name": "aseem"})).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("userData"), Some(json!({"name": "aseem"})));
    }

    #[test]
    fn test_malformed_file_recovered_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.get("anything").is_none());

        // The store stays usable after recovery.
        store.set("k", json!(1)).unwrap();
        assert_eq!(store.get("k"), Some(json!(1)));
    }

    #[test]
    fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set("k", json!(1)).unwrap();
        assert!(store.remove("k"));
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert!(reopened.get("k").is_none());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.json");
        let store = FileStore::open(&path).unwrap();
        store.set("k", json!(true)).unwrap();
        assert!(path.exists());
    }
}
