//! Outbound conversion.

use crate::error::{CodecError, CodecResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use taskmaster_core::{Snapshot, TransferDocument};

/// Serializes a document as compact JSON.
///
/// # Errors
///
/// Returns `EncodingFailed` if serialization fails.
pub fn to_json(document: &TransferDocument) -> CodecResult<String> {
    serde_json::to_string(document).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

/// Serializes a document as JSON indented with two spaces.
///
/// # Errors
///
/// Returns `EncodingFailed` if serialization fails.
pub fn to_json_pretty(document: &TransferDocument) -> CodecResult<String> {
    serde_json::to_string_pretty(document).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

/// Encodes a document as a sync code.
///
/// # Errors
///
/// Returns `EncodingFailed` if serialization fails, which does not happen
/// for documents built from the model types.
pub fn encode(document: &TransferDocument) -> CodecResult<String> {
    Ok(STANDARD.encode(to_json(document)?))
}

/// Encodes the transferable part of a snapshot. The theme is left out.
///
/// # Errors
///
/// See [`encode`].
pub fn encode_snapshot(snapshot: &Snapshot) -> CodecResult<String> {
    encode(&snapshot.to_document())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmaster_core::{Priority, Theme, Todo};

    fn one_todo() -> TransferDocument {
        let mut todo = Todo::new("buy milk", Priority::Low);
        todo.id = 1;
        TransferDocument {
            todos: vec![todo],
            ..TransferDocument::default()
        }
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let json = to_json(&one_todo()).unwrap();
        assert_eq!(
            json,
            r#"{"todos":[{"id":1,"title":"buy milk","completed":false,"priority":"low"}],"projects":[],"notes":[],"reminders":[]}"#
        );
        assert!(!json.contains("dueDate"));
        assert!(!json.contains("projectId"));
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(encode(&one_todo()).unwrap(), encode(&one_todo()).unwrap());
    }

    #[test]
    fn snapshot_theme_does_not_affect_code() {
        let mut light = taskmaster_core::Snapshot::from_document(one_todo(), Theme::Light);
        let code = encode_snapshot(&light).unwrap();
        light.theme = Theme::Dark;
        assert_eq!(encode_snapshot(&light).unwrap(), code);
    }

    #[test]
    fn pretty_output_uses_two_spaces() {
        let pretty = to_json_pretty(&TransferDocument::default()).unwrap();
        assert!(pretty.starts_with("{\n  \"todos\": []"));
    }
}
