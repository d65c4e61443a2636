//! Trust-boundary validation of transfer documents.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use taskmaster_core::{is_valid_id, Entity, TransferDocument};

/// Top-level keys of a transfer document.
pub const COLLECTION_KEYS: [&str; 4] = ["todos", "projects", "notes", "reminders"];

/// Parses and validates a JSON transfer document.
///
/// Used for sync code payloads and for backup files alike.
///
/// # Errors
///
/// - `InvalidJson` if the bytes are not UTF-8 JSON
/// - `InvalidShape` if the JSON is not a document
/// - `InvalidId` if a record id is outside `1..=MAX_ID`
/// - `DuplicateId` if a collection repeats an id
pub fn parse_document(bytes: &[u8]) -> CodecResult<TransferDocument> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| CodecError::invalid_json(format!("payload is not UTF-8: {e}")))?;
    let value: Value =
        serde_json::from_str(text).map_err(|e| CodecError::invalid_json(e.to_string()))?;

    let mut map = match value {
        Value::Object(map) => map,
        other => {
            return Err(CodecError::invalid_shape(format!(
                "expected an object, found {}",
                describe(&other)
            )))
        }
    };
    if !COLLECTION_KEYS.iter().any(|key| map.contains_key(*key)) {
        return Err(CodecError::invalid_shape(
            "object has none of the expected collections",
        ));
    }

    let document = TransferDocument {
        todos: collection(&mut map, "todos")?,
        projects: collection(&mut map, "projects")?,
        notes: collection(&mut map, "notes")?,
        reminders: collection(&mut map, "reminders")?,
    };
    validate(&document)?;
    Ok(document)
}

/// Checks the invariants that typed deserialization cannot express.
///
/// # Errors
///
/// Returns `InvalidId` for the first id outside `1..=MAX_ID`, or
/// `DuplicateId` for the first id repeated within a collection.
pub fn validate(document: &TransferDocument) -> CodecResult<()> {
    unique_valid_ids("todos", &document.todos)?;
    unique_valid_ids("projects", &document.projects)?;
    unique_valid_ids("notes", &document.notes)?;
    unique_valid_ids("reminders", &document.reminders)
}

fn unique_valid_ids<T: Entity>(collection: &'static str, items: &[T]) -> CodecResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !is_valid_id(item.id()) {
            return Err(CodecError::InvalidId {
                collection,
                id: item.id(),
            });
        }
        if !seen.insert(item.id()) {
            return Err(CodecError::DuplicateId {
                collection,
                id: item.id(),
            });
        }
    }
    Ok(())
}

fn collection<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    key: &'static str,
) -> CodecResult<Vec<T>> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item)
                    .map_err(|e| CodecError::invalid_shape(format!("{key}[{index}]: {e}")))
            })
            .collect(),
        Some(other) => Err(CodecError::invalid_shape(format!(
            "{key}: expected an array, found {}",
            describe(&other)
        ))),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
