//! Error types for Taskmaster core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] taskmaster_storage::StorageError),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Entity not found.
    #[error("{kind} not found: {id}")]
    EntityNotFound {
        /// Entity kind (`note`, `todo`, `project`, `reminder`).
        kind: &'static str,
        /// The identifier that was not found.
        id: i64,
    },

    /// Entity failed validation before insert or update.
    #[error("invalid {kind}: {message}")]
    InvalidEntity {
        /// Entity kind.
        kind: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// No id above the last one handed out fits the valid id range.
    #[error("no ids left after {last}")]
    IdSpaceExhausted {
        /// The largest id handed out or observed.
        last: i64,
    },
}

impl CoreError {
    /// Creates an entity not found error.
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        Self::EntityNotFound { kind, id }
    }

    /// Creates an invalid entity error.
    pub fn invalid_entity(kind: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidEntity {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoreError::not_found("todo", 99);
        assert_eq!(err.to_string(), "todo not found: 99");

        let err = CoreError::invalid_entity("note", "title is empty");
        assert_eq!(err.to_string(), "invalid note: title is empty");

        let err = CoreError::IdSpaceExhausted { last: 42 };
        assert_eq!(err.to_string(), "no ids left after 42");
    }
}
