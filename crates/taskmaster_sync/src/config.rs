//! Configuration for the sync subsystem.

use std::path::PathBuf;

/// Default backup file name prefix.
pub const DEFAULT_FILE_PREFIX: &str = "taskmaster_backup";

/// What a scan session does when a frame carries an invalid code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidCodePolicy {
    /// Report the problem and keep scanning.
    #[default]
    KeepScanning,
    /// End the session and show the error.
    Abort,
}

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory backups are exported to.
    pub export_dir: PathBuf,
    /// Reaction to an invalid scanned code.
    pub invalid_code_policy: InvalidCodePolicy,
    /// Backup file name prefix; the date and `.json` are appended.
    pub file_prefix: String,
    /// Whether backup files are indented for reading.
    pub pretty_export: bool,
}

impl SyncConfig {
    /// Creates a configuration exporting to `export_dir`.
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            invalid_code_policy: InvalidCodePolicy::default(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            pretty_export: true,
        }
    }

    /// Sets the invalid code policy.
    #[must_use]
    pub fn with_invalid_code_policy(mut self, policy: InvalidCodePolicy) -> Self {
        self.invalid_code_policy = policy;
        self
    }

    /// Sets the backup file name prefix.
    #[must_use]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Sets whether backup files are indented.
    #[must_use]
    pub fn with_pretty_export(mut self, pretty: bool) -> Self {
        self.pretty_export = pretty;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.invalid_code_policy, InvalidCodePolicy::KeepScanning);
        assert_eq!(config.file_prefix, "taskmaster_backup");
        assert!(config.pretty_export);
    }

    #[test]
    fn builder_pattern() {
        let config = SyncConfig::new("/tmp/out")
            .with_invalid_code_policy(InvalidCodePolicy::Abort)
            .with_file_prefix("backup")
            .with_pretty_export(false);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.invalid_code_policy, InvalidCodePolicy::Abort);
        assert_eq!(config.file_prefix, "backup");
        assert!(!config.pretty_export);
    }
}
