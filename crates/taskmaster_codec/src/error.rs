//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a transfer document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to serialize the document.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// The code is not valid base64.
    #[error("invalid encoding: {message}")]
    InvalidEncoding {
        /// Description of the encoding error.
        message: String,
    },

    /// The payload is not valid UTF-8 JSON.
    #[error("invalid JSON: {message}")]
    InvalidJson {
        /// Description of the parse error.
        message: String,
    },

    /// The JSON does not have the transfer document shape.
    #[error("invalid document shape: {message}")]
    InvalidShape {
        /// Description of the structural error.
        message: String,
    },

    /// Two records in one collection share an id.
    #[error("duplicate id {id} in {collection}")]
    DuplicateId {
        /// Collection containing the duplicate.
        collection: &'static str,
        /// The repeated id.
        id: i64,
    },

    /// A record id is not positive or exceeds the safe integer range.
    #[error("id {id} in {collection} is out of range")]
    InvalidId {
        /// Collection containing the record.
        collection: &'static str,
        /// The offending id.
        id: i64,
    },
}

impl CodecError {
    /// Creates an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid encoding error.
    pub fn invalid_encoding(message: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            message: message.into(),
        }
    }

    /// Creates an invalid JSON error.
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::InvalidJson {
            message: message.into(),
        }
    }

    /// Creates an invalid shape error.
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        Self::InvalidShape {
            message: message.into(),
        }
    }
}
