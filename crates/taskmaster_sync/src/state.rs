//! Sync controller states.

use std::fmt;

/// Where an import is reading from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportSource {
    /// A backup file.
    File,
    /// A pasted sync code.
    Code,
}

/// The current state of the sync controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Writing a backup file.
    Exporting,
    /// Encoding the current snapshot.
    GeneratingCode,
    /// A code is on display, ready to copy, render or replace by a paste.
    CodeReady(String),
    /// Reading and applying an inbound document.
    Importing(ImportSource),
    /// The camera is live and frames are being decoded.
    Scanning,
    /// The last operation failed; holds the user-facing message.
    Error(String),
}

impl SyncState {
    /// Returns true while an operation holds the controller.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SyncState::Exporting
                | SyncState::GeneratingCode
                | SyncState::Importing(_)
                | SyncState::Scanning
        )
    }

    /// Returns true if a new transport request may start.
    pub fn can_start(&self) -> bool {
        matches!(self, SyncState::Idle)
    }

    /// Returns true if a pasted code may be imported.
    ///
    /// Generating and pasting share one text box, so a paste is also
    /// accepted while a generated code is on display.
    pub fn can_accept_paste(&self) -> bool {
        matches!(self, SyncState::Idle | SyncState::CodeReady(_))
    }

    /// Name of the state without its payload.
    pub fn name(&self) -> &'static str {
        match self {
            SyncState::Idle => "Idle",
            SyncState::Exporting => "Exporting",
            SyncState::GeneratingCode => "GeneratingCode",
            SyncState::CodeReady(_) => "CodeReady",
            SyncState::Importing(_) => "Importing",
            SyncState::Scanning => "Scanning",
            SyncState::Error(_) => "Error",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counters describing controller activity.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Backup files written.
    pub exports: u64,
    /// Codes generated.
    pub codes_generated: u64,
    /// Documents applied to the store, from any channel.
    pub imports: u64,
    /// Invalid codes seen while scanning.
    pub rejected_codes: u64,
    /// Requests ignored because another operation was running.
    pub ignored_requests: u64,
    /// Last error, in developer-facing form.
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_predicates() {
        assert!(SyncState::Idle.can_start());
        assert!(!SyncState::Scanning.can_start());
        assert!(!SyncState::Error("x".into()).can_start());
        assert!(SyncState::Scanning.is_active());
        assert!(!SyncState::CodeReady("abc".into()).is_active());
        assert!(SyncState::CodeReady("abc".into()).can_accept_paste());
        assert!(!SyncState::Importing(ImportSource::File).can_accept_paste());
    }

    #[test]
    fn display_omits_payload() {
        assert_eq!(SyncState::CodeReady("secret".into()).to_string(), "CodeReady");
        assert_eq!(SyncState::Importing(ImportSource::Code).to_string(), "Importing");
    }
}
