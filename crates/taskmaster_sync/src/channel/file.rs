//! Backup file export and import.

use crate::config::{SyncConfig, DEFAULT_FILE_PREFIX};
use crate::error::{SyncError, SyncResult};
use chrono::{NaiveDate, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use taskmaster_codec::{parse_document, to_json, to_json_pretty};
use taskmaster_core::{Snapshot, TransferDocument};
use tracing::{debug, info};

/// Reads and writes backup files.
///
/// A backup is the UTF-8 JSON of a transfer document, named
/// `<prefix>_<YYYY-MM-DD>.json` after the UTC export date.
#[derive(Debug, Clone)]
pub struct FileChannel {
    prefix: String,
    pretty: bool,
}

impl Default for FileChannel {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_FILE_PREFIX.to_string(),
            pretty: true,
        }
    }
}

impl FileChannel {
    /// Creates a channel with the default prefix and indented output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a channel from the sync configuration.
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            prefix: config.file_prefix.clone(),
            pretty: config.pretty_export,
        }
    }

    /// Backup file name for a given date.
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.json", self.prefix, date.format("%Y-%m-%d"))
    }

    /// Serializes the transferable part of a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Codec` if serialization fails.
    pub fn export_bytes(&self, snapshot: &Snapshot) -> SyncResult<Vec<u8>> {
        let document = snapshot.to_document();
        let json = if self.pretty {
            to_json_pretty(&document)?
        } else {
            to_json(&document)?
        };
        Ok(json.into_bytes())
    }

    /// Writes a backup file into `dir` and returns its path.
    ///
    /// The file is written next to its final name and renamed into place,
    /// so a reader never sees a partial backup. An existing backup from the
    /// same day is replaced.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory or file cannot be written.
    pub fn export_to_file(&self, snapshot: &Snapshot, dir: &Path) -> SyncResult<PathBuf> {
        let bytes = self.export_bytes(snapshot)?;
        fs::create_dir_all(dir)?;

        let path = dir.join(self.file_name(Utc::now().date_naive()));
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)?;

        info!(path = %path.display(), bytes = bytes.len(), "exported backup");
        Ok(path)
    }

    /// Parses backup bytes.
    ///
    /// # Errors
    ///
    /// Returns `ImportParse` if the bytes are not a valid document.
    pub fn import_from_bytes(&self, bytes: &[u8]) -> SyncResult<TransferDocument> {
        let document = parse_document(bytes).map_err(SyncError::ImportParse)?;
        debug!(bytes = bytes.len(), "parsed backup");
        Ok(document)
    }

    /// Reads and parses a backup file.
    ///
    /// # Errors
    ///
    /// Returns `ImportRead` if the file cannot be read and `ImportParse` if
    /// it is not a valid document.
    pub fn import_from_path(&self, path: &Path) -> SyncResult<TransferDocument> {
        let bytes = fs::read(path).map_err(|source| SyncError::ImportRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmaster_core::sample_snapshot;
    use tempfile::tempdir;

    #[test]
    fn file_name_uses_prefix_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            FileChannel::new().file_name(date),
            "taskmaster_backup_2024-03-05.json"
        );
        let config = SyncConfig::default().with_file_prefix("tm");
        assert_eq!(
            FileChannel::from_config(&config).file_name(date),
            "tm_2024-03-05.json"
        );
    }

    #[test]
    fn export_then_import() {
        let dir = tempdir().unwrap();
        let channel = FileChannel::new();
        let snapshot = sample_snapshot();

        let path = channel.export_to_file(&snapshot, dir.path()).unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(!path.with_extension("json.tmp").exists());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"todos\": ["));
        assert!(!text.contains("theme"));

        let document = channel.import_from_path(&path).unwrap();
        assert_eq!(document, snapshot.to_document());
    }

    #[test]
    fn compact_export() {
        let channel = FileChannel::from_config(&SyncConfig::default().with_pretty_export(false));
        let bytes = channel.export_bytes(&Snapshot::default()).unwrap();
        assert_eq!(bytes, br#"{"todos":[],"projects":[],"notes":[],"reminders":[]}"#);
    }

    #[test]
    fn bad_files_are_rejected() {
        let channel = FileChannel::new();
        assert!(matches!(
            channel.import_from_bytes(b"not json"),
            Err(SyncError::ImportParse(_))
        ));
        assert!(matches!(
            channel.import_from_bytes(br#"{"theme":"dark"}"#),
            Err(SyncError::ImportParse(_))
        ));

        let dir = tempdir().unwrap();
        assert!(matches!(
            channel.import_from_path(&dir.path().join("missing.json")),
            Err(SyncError::ImportRead { .. })
        ));
    }
}
