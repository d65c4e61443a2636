//! Key-value store trait definition.

use crate::error::{StorageError, StorageResult};

/// A durable key-value store for Taskmaster documents.
///
/// Stores are **opaque byte maps**. Taskmaster owns all interpretation of
/// the values; stores never parse what they hold.
///
/// # Invariants
///
/// - `get` returns exactly the bytes of the last successful `put` for a key
/// - A failed `put` leaves the previous value readable
/// - `flush` makes all completed writes durable
/// - Stores must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written or was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn put(&mut self, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Removes `key`. Returns `true` if a value was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn remove(&mut self, key: &str) -> StorageResult<bool>;

    /// Returns all keys currently present, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the keys cannot be enumerated.
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Flushes all completed writes to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;
}

/// Checks that a key is non-empty and limited to `[A-Za-z0-9_-]`.
///
/// Keys double as file names for [`super::FileStore`], so path separators
/// and dots are rejected everywhere to keep both stores interchangeable.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] for any other key.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
