//! In-memory store. The default backend for tests and for the demo shell.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::error::StoreError;

use super::KeyValueStore;

/// Volatile store backed by a `RwLock<HashMap>`.
///
/// An optional byte quota approximates the host storage limit: a `set`
/// whose serialized value would push the total past the quota fails with
/// [`StoreError::QuotaExceeded`] and leaves the previous value intact.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: None,
        }
    }

    /// A store that rejects writes once the summed serialized size of all
    /// values would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn serialized_len(value: &Value) -> usize {
        value.to_string().len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        match self.entries.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => {
                log::warn!("store lock poisoned reading '{}', treating as absent", key);
                None
            }
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;

        if let Some(quota) = self.quota_bytes {
            let incoming = Self::serialized_len(&value);
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| Self::serialized_len(v))
                .sum();
            if others + incoming > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    attempted: others + incoming,
                    quota,
                });
            }
        }

        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> bool {
        match self.entries.write() {
            Ok(mut entries) => entries.remove(key).is_some(),
            Err(_) => false,
        }
    }
}
