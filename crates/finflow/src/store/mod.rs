//! Local key/value document store.
//!
//! The store is the external interface of the whole engine: a synchronous,
//! string-keyed mapping to JSON documents, scoped to one profile/device.
//! Absence is a valid, expected state (first visit). `set` overwrites the
//! entire value; callers read-modify-write, and there is no transactional
//! guarantee across keys (single-writer model, documented at this boundary).

use std::path::PathBuf;

use serde_json::Value;

pub mod file;
pub mod keys;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

pub trait KeyValueStore: Send + Sync {
    /// Reads the document under `key`. Never fails; a missing key is `None`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Overwrites the entire document under `key`. The only failure modes
    /// are quota exhaustion and (for file-backed stores) I/O errors, both
    /// surfaced as non-fatal [`StoreError`]s for the caller to handle.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Removes the document under `key`. Returns whether it existed.
    fn remove(&self, key: &str) -> bool;
}

/// Canonical on-disk location: `~/.finflow/data/store.json`.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".finflow").join("data").join("store.json"))
}
