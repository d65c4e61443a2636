//! In-memory key-value store for testing.

use crate::backend::{validate_key, KeyValueStore};
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory key-value store.
///
/// This store keeps all values in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral sessions that don't need persistence
///
/// # Example
///
/// ```rust
/// use taskmaster_storage::{KeyValueStore, InMemoryStore};
///
/// let mut store = InMemoryStore::new();
/// store.put("notes", b"[]").unwrap();
/// assert_eq!(store.keys().unwrap(), vec!["notes".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with pre-existing entries.
    ///
    /// Useful for testing hydration of previously saved (or corrupted) data.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Returns a copy of all entries.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, Vec<u8>> {
        self.entries.read().clone()
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.entries.write().clear();
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> StorageResult<()> {
        validate_key(key)?;
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        Ok(self.entries.write().remove(key).is_some())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    fn flush(&mut self) -> StorageResult<()> {
        // Nothing is buffered
        Ok(())
    }
}
