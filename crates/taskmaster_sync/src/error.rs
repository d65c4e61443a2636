//! Error types for the sync subsystem.

use std::fmt;
use std::path::PathBuf;
use taskmaster_codec::CodecError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// The medium a document travelled through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Backup file.
    File,
    /// Pasted or copied text code.
    Text,
    /// Camera-scanned visual code.
    VisualCode,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelKind::File => "file",
            ChannelKind::Text => "text code",
            ChannelKind::VisualCode => "visual code",
        })
    }
}

/// Errors that can occur during sync operations.
///
/// None of them is fatal; the controller turns each into a user-facing
/// message and returns to a state from which the user can retry.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A sync code could not be decoded.
    #[error("invalid {channel}: {source}")]
    Decode {
        /// Where the code came from.
        channel: ChannelKind,
        /// The codec failure.
        #[source]
        source: CodecError,
    },

    /// A backup file is not a valid document.
    #[error("invalid backup file: {0}")]
    ImportParse(#[source] CodecError),

    /// A backup file could not be read.
    #[error("failed to read {path}: {source}")]
    ImportRead {
        /// The file.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The camera could not be acquired.
    #[error("camera access failed: {0}")]
    CameraAccess(String),

    /// The clipboard rejected the text.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// The visual code could not be rendered.
    #[error("render error: {0}")]
    Render(String),

    /// The requested transition is not allowed from the current state.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// Encoding failure.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Creates a decode error for a channel.
    pub fn decode(channel: ChannelKind, source: CodecError) -> Self {
        Self::Decode { channel, source }
    }

    /// Creates a camera access error.
    pub fn camera_access(message: impl Into<String>) -> Self {
        Self::CameraAccess(message.into())
    }

    /// The message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            SyncError::Decode {
                channel: ChannelKind::VisualCode,
                ..
            } => "Invalid QR code. Please try again.",
            SyncError::Decode { .. } => "Invalid sync code. Please check and try again.",
            SyncError::ImportParse(_) | SyncError::ImportRead { .. } => {
                "Failed to import data. Please check your file."
            }
            SyncError::CameraAccess(_) => {
                "Camera access failed. Please check permissions and try again."
            }
            SyncError::Clipboard(_) => "Could not copy the code. Please copy it manually.",
            SyncError::Render(_) => "Could not display the QR code.",
            SyncError::Io(_) => "Could not write the backup file.",
            SyncError::InvalidStateTransition { .. } | SyncError::Codec(_) => {
                "Something went wrong. Please try again."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_depend_on_channel() {
        let text = SyncError::decode(ChannelKind::Text, CodecError::invalid_encoding("x"));
        let visual = SyncError::decode(ChannelKind::VisualCode, CodecError::invalid_encoding("x"));
        assert_eq!(
            text.user_message(),
            "Invalid sync code. Please check and try again."
        );
        assert_eq!(visual.user_message(), "Invalid QR code. Please try again.");
        assert_eq!(
            SyncError::ImportParse(CodecError::invalid_json("eof")).user_message(),
            "Failed to import data. Please check your file."
        );
    }

    #[test]
    fn error_display() {
        let err = SyncError::decode(ChannelKind::Text, CodecError::invalid_encoding("bad byte"));
        assert_eq!(
            err.to_string(),
            "invalid text code: invalid encoding: bad byte"
        );
        let err = SyncError::InvalidStateTransition {
            from: "Scanning".into(),
            to: "Exporting".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid state transition from Scanning to Exporting"
        );
    }

    #[test]
    fn converted_errors_have_messages() {
        let io: SyncError = std::io::Error::other("disk full").into();
        assert!(matches!(io, SyncError::Io(_)));
        assert_eq!(io.user_message(), "Could not write the backup file.");

        let codec: SyncError = CodecError::invalid_json("eof").into();
        assert!(matches!(codec, SyncError::Codec(_)));
        assert_eq!(
            codec.user_message(),
            "Something went wrong. Please try again."
        );
    }
}
