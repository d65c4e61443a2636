//! Inbound conversion.

use crate::error::{CodecError, CodecResult};
use crate::validate::parse_document;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use taskmaster_core::TransferDocument;
use tracing::debug;

/// Decodes a sync code.
///
/// # Errors
///
/// - `InvalidEncoding` if the code is empty or not base64
/// - `InvalidJson` if the payload is not UTF-8 JSON
/// - `InvalidShape`, `InvalidId` or `DuplicateId` if the JSON is not a valid document
pub fn decode(code: &str) -> CodecResult<TransferDocument> {
    let compact: String = code.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(CodecError::invalid_encoding("empty code"));
    }

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| CodecError::invalid_encoding(e.to_string()))?;
    debug!(code_len = compact.len(), payload_len = bytes.len(), "decoded sync code");

    parse_document(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;
    use proptest::prelude::*;
    use taskmaster_core::{Priority, Todo};

    fn b64(text: &str) -> String {
        STANDARD.encode(text)
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "   ", "%%%", "abc", "a", "ab$d"] {
            assert!(
                matches!(decode(input), Err(CodecError::InvalidEncoding { .. })),
                "{input:?}"
            );
        }
    }

    #[test]
    fn rejects_non_json_payload() {
        assert!(matches!(
            decode(&b64("hello world")),
            Err(CodecError::InvalidJson { .. })
        ));
        let not_utf8 = STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode(&not_utf8), Err(CodecError::InvalidJson { .. })));
    }

    #[test]
    fn rejects_wrong_shape() {
        for json in ["[]", "42", "{}", r#"{"todos":{}}"#, r#"{"notes":[{"id":1}]}"#] {
            assert!(
                matches!(decode(&b64(json)), Err(CodecError::InvalidShape { .. })),
                "{json}"
            );
        }
    }

    #[test]
    fn tolerates_wrapped_codes() {
        let mut todo = Todo::new("buy milk", Priority::Low);
        todo.id = 1;
        let document = TransferDocument {
            todos: vec![todo],
            ..TransferDocument::default()
        };
        let code = encode(&document).unwrap();
        let wrapped: String = code
            .as_bytes()
            .chunks(10)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("\n  ");
        assert_eq!(decode(&format!(" {wrapped}\r\n")).unwrap(), document);
    }

    #[test]
    fn partial_documents_default_missing_collections() {
        let document = decode(&b64(r#"{"reminders":[]}"#)).unwrap();
        assert!(document.is_empty());
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_text(input in ".{0,200}") {
            let _ = decode(&input);
        }

        #[test]
        fn never_panics_on_arbitrary_payload(bytes in proptest::collection::vec(any::<u8>(), 0..200)) {
            let _ = decode(&STANDARD.encode(bytes));
        }
    }
}
