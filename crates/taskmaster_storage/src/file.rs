//! File-based key-value store for persistent storage.
//!
//! Layout of a data directory:
//!
//! ```text
//! <data_dir>/
//! ├─ LOCK              # Advisory lock for single-writer
//! ├─ notes.json
//! ├─ todos.json
//! ├─ projects.json
//! ├─ reminders.json
//! └─ theme.json
//! ```

use crate::backend::{validate_key, KeyValueStore};
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const LOCK_FILE: &str = "LOCK";
const VALUE_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// A file-based key-value store.
///
/// Each key is stored in its own `<key>.json` file inside the data
/// directory. Writes go to a temporary file that is synced and then renamed
/// over the target, so a crash mid-write leaves the previous value intact.
///
/// # Locking
///
/// The store holds an exclusive advisory lock on `<data_dir>/LOCK` for its
/// whole lifetime. A second `open` of the same directory fails with
/// [`StorageError::Locked`]. The lock is released on drop.
///
/// # Example
///
/// ```no_run
/// use taskmaster_storage::{KeyValueStore, FileStore};
/// use std::path::Path;
///
/// let mut store = FileStore::open(Path::new("taskmaster-data")).unwrap();
/// store.put("todos", b"[]").unwrap();
/// store.flush().unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    _lock_file: File,
}

impl FileStore {
    /// Opens or creates a store in `dir`, creating parent directories if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `dir` exists but is not a directory
    /// - Another process holds the lock (returns [`StorageError::Locked`])
    /// - I/O errors occur
    pub fn open(dir: &Path) -> StorageResult<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        if !dir.is_dir() {
            return Err(StorageError::NotADirectory(dir.display().to_string()));
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked);
        }

        debug!(dir = %dir.display(), "opened file store");

        Ok(Self {
            dir: dir.to_path_buf(),
            _lock_file: lock_file,
        })
    }

    /// Returns the data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file that holds `key`.
    #[must_use]
    pub fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{VALUE_EXTENSION}"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{TEMP_EXTENSION}"))
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> StorageResult<()> {
        File::open(&self.dir)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_key(key)?;
        match fs::read(self.value_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&mut self, key: &str, value: &[u8]) -> StorageResult<()> {
        validate_key(key)?;

        let temp_path = self.temp_path(key);
        let mut file = File::create(&temp_path)?;
        file.write_all(value)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, self.value_path(key))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        match fs::remove_file(self.value_path(key)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_key(stem).is_ok() {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn flush(&mut self) -> StorageResult<()> {
        self.sync_directory()
    }
}
