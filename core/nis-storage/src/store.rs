//! The key-value store abstraction and the in-memory backend.

use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// A small string key-value store.
///
/// Every call is synchronous: a `set` or `delete` either completes before
/// returning or returns an error. Implementations serialize access to their
/// own state; distinct stores are independent.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes a value. Removing a missing key succeeds.
    fn delete(&self, key: &str) -> StorageResult<()>;
}

/// In-process store for tests and ephemeral hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

pub(crate) fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Unavailable("lock poisoned".to_string())
}
