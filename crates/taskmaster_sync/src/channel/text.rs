//! Copy-and-paste sync codes.

use crate::device::Clipboard;
use crate::error::{ChannelKind, SyncError, SyncResult};
use taskmaster_codec::{decode, encode_snapshot};
use taskmaster_core::{Snapshot, TransferDocument};
use tracing::{debug, warn};

/// Moves documents as sync code text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextChannel;

impl TextChannel {
    /// Creates the channel.
    pub fn new() -> Self {
        Self
    }

    /// Encodes the transferable part of a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Codec` if encoding fails.
    pub fn generate_code(&self, snapshot: &Snapshot) -> SyncResult<String> {
        let code = encode_snapshot(snapshot)?;
        debug!(len = code.len(), "generated sync code");
        Ok(code)
    }

    /// Puts a code on the clipboard. Returns whether it worked; a failure
    /// is logged and the user can still copy the code by hand.
    pub fn copy_to_clipboard(&self, code: &str, clipboard: &dyn Clipboard) -> bool {
        match clipboard.set_text(code) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to copy sync code");
                false
            }
        }
    }

    /// Decodes a pasted code.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the text is not a valid code.
    pub fn accept_pasted(&self, text: &str) -> SyncResult<TransferDocument> {
        decode(text).map_err(|source| SyncError::decode(ChannelKind::Text, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemoryClipboard;
    use taskmaster_core::sample_snapshot;

    #[test]
    fn generate_copy_paste() {
        let channel = TextChannel::new();
        let snapshot = sample_snapshot();
        let code = channel.generate_code(&snapshot).unwrap();

        let clipboard = MemoryClipboard::new();
        assert!(channel.copy_to_clipboard(&code, &clipboard));
        let pasted = clipboard.contents().unwrap();

        assert_eq!(channel.accept_pasted(&pasted).unwrap(), snapshot.to_document());
    }

    #[test]
    fn clipboard_failure_is_reported_not_raised() {
        assert!(!TextChannel::new().copy_to_clipboard("abc", &MemoryClipboard::unavailable()));
    }

    #[test]
    fn garbage_paste() {
        let err = TextChannel::new().accept_pasted("hello?").unwrap_err();
        assert!(matches!(
            err,
            SyncError::Decode {
                channel: ChannelKind::Text,
                ..
            }
        ));
    }
}
