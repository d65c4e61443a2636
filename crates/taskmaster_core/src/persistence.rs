//! Bridge between the in-memory snapshot and durable key-value storage.
//!
//! Each snapshot field is stored as its own JSON document under its own key
//! (`notes`, `todos`, `projects`, `reminders`, `theme`). Hydration is lenient
//! per key: a missing or unreadable key falls back to that field's default
//! and never prevents the other keys from loading.

use crate::error::CoreResult;
use crate::model::{Snapshot, SnapshotField, Theme};
use parking_lot::{Mutex, MutexGuard};
use serde::de::DeserializeOwned;
use taskmaster_storage::{InMemoryStore, KeyValueStore};
use tracing::{debug, warn};

/// Serialized value of one snapshot field.
pub(crate) type EncodedField = (SnapshotField, CoreResult<Vec<u8>>);

/// Loads and saves snapshots through a [`KeyValueStore`].
pub struct PersistenceAdapter {
    backend: Mutex<Box<dyn KeyValueStore>>,
}

impl PersistenceAdapter {
    /// Wraps a storage backend.
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    /// Wraps an already boxed storage backend.
    pub fn from_boxed(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    /// Creates an adapter over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }

    /// Reads every field, substituting defaults for missing or invalid keys.
    pub fn hydrate(&self) -> Snapshot {
        let backend = self.backend.lock();
        let snapshot = Snapshot {
            notes: read_collection(backend.as_ref(), SnapshotField::Notes),
            todos: read_collection(backend.as_ref(), SnapshotField::Todos),
            projects: read_collection(backend.as_ref(), SnapshotField::Projects),
            reminders: read_collection(backend.as_ref(), SnapshotField::Reminders),
            theme: read_theme(backend.as_ref()),
        };
        debug!(
            notes = snapshot.notes.len(),
            todos = snapshot.todos.len(),
            projects = snapshot.projects.len(),
            reminders = snapshot.reminders.len(),
            theme = %snapshot.theme,
            "hydrated snapshot"
        );
        snapshot
    }

    /// Writes every field. Failures are logged and otherwise ignored.
    pub fn save(&self, snapshot: &Snapshot) {
        self.save_fields(snapshot, &SnapshotField::ALL);
    }

    /// Writes a single field. Failures are logged and otherwise ignored.
    pub fn save_key(&self, snapshot: &Snapshot, field: SnapshotField) {
        self.save_fields(snapshot, &[field]);
    }

    /// Writes the given fields. Failures are logged and otherwise ignored.
    pub fn save_fields(&self, snapshot: &Snapshot, fields: &[SnapshotField]) {
        let encoded = encode_fields(snapshot, fields);
        self.lock_writer().write(encoded);
    }

    /// Writes every field and flushes, reporting the first failure.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any write fails.
    pub fn try_save(&self, snapshot: &Snapshot) -> CoreResult<()> {
        let mut backend = self.backend.lock();
        for field in SnapshotField::ALL {
            let bytes = encode_field(snapshot, field)?;
            backend.put(field.key(), &bytes)?;
        }
        backend.flush()?;
        Ok(())
    }

    /// Flushes the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot sync.
    pub fn flush(&self) -> CoreResult<()> {
        self.backend.lock().flush()?;
        Ok(())
    }

    /// Returns the raw bytes stored under a field's key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    pub fn raw(&self, field: SnapshotField) -> CoreResult<Option<Vec<u8>>> {
        Ok(self.backend.lock().get(field.key())?)
    }

    /// Takes exclusive access to the backend for an ordered write.
    ///
    /// The store acquires this before releasing its own state lock, so
    /// writes land in the same order as the mutations that produced them.
    pub(crate) fn lock_writer(&self) -> SaveGuard<'_> {
        SaveGuard {
            backend: self.backend.lock(),
        }
    }
}

impl std::fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceAdapter").finish_non_exhaustive()
    }
}

/// Exclusive handle on the backend used for one batch of writes.
pub(crate) struct SaveGuard<'a> {
    backend: MutexGuard<'a, Box<dyn KeyValueStore>>,
}

impl SaveGuard<'_> {
    /// Writes pre-encoded fields, logging every failure.
    pub(crate) fn write(&mut self, encoded: Vec<EncodedField>) {
        for (field, bytes) in encoded {
            let result = bytes.and_then(|bytes| {
                self.backend
                    .put(field.key(), &bytes)
                    .map_err(Into::into)
            });
            match result {
                Ok(()) => debug!(key = field.key(), "saved field"),
                Err(err) => warn!(key = field.key(), error = %err, "failed to save field"),
            }
        }
    }

    /// Writes pre-encoded fields and flushes, stopping at the first failure.
    pub(crate) fn try_write(&mut self, encoded: Vec<EncodedField>) -> CoreResult<()> {
        for (field, bytes) in encoded {
            self.backend.put(field.key(), &bytes?)?;
        }
        self.backend.flush()?;
        Ok(())
    }
}

/// Serializes the given fields of a snapshot.
pub(crate) fn encode_fields(snapshot: &Snapshot, fields: &[SnapshotField]) -> Vec<EncodedField> {
    fields
        .iter()
        .map(|field| (*field, encode_field(snapshot, *field)))
        .collect()
}

fn encode_field(snapshot: &Snapshot, field: SnapshotField) -> CoreResult<Vec<u8>> {
    let bytes = match field {
        SnapshotField::Notes => serde_json::to_vec(&snapshot.notes)?,
        SnapshotField::Todos => serde_json::to_vec(&snapshot.todos)?,
        SnapshotField::Projects => serde_json::to_vec(&snapshot.projects)?,
        SnapshotField::Reminders => serde_json::to_vec(&snapshot.reminders)?,
        SnapshotField::Theme => serde_json::to_vec(&snapshot.theme)?,
    };
    Ok(bytes)
}

fn read_collection<T: DeserializeOwned>(backend: &dyn KeyValueStore, field: SnapshotField) -> Vec<T> {
    let bytes = match backend.get(field.key()) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!(key = field.key(), "no stored value, using empty collection");
            return Vec::new();
        }
        Err(err) => {
            warn!(key = field.key(), error = %err, "failed to read key, using empty collection");
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(items) => items,
        Err(err) => {
            warn!(key = field.key(), error = %err, "unparsable stored value, using empty collection");
            Vec::new()
        }
    }
}

fn read_theme(backend: &dyn KeyValueStore) -> Theme {
    let key = SnapshotField::Theme.key();
    let bytes = match backend.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Theme::default(),
        Err(err) => {
            warn!(key, error = %err, "failed to read key, using default theme");
            return Theme::default();
        }
    };

    if let Ok(theme) = serde_json::from_slice::<Theme>(&bytes) {
        return theme;
    }

    // Older builds stored the bare word without JSON quotes.
    match std::str::from_utf8(&bytes).map(str::parse::<Theme>) {
        Ok(Ok(theme)) => theme,
        _ => {
            warn!(key, "unparsable stored theme, using default theme");
            Theme::default()
        }
    }
}
