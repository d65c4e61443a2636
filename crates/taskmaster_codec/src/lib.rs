//! # Taskmaster Codec
//!
//! Converts a [`TransferDocument`] to and from the compact text form used
//! by sync codes and visual codes, and validates documents arriving from
//! any outside source.
//!
//! ## Format
//!
//! A sync code is the standard, padded base64 of the document's compact
//! JSON. JSON field order is fixed by the struct definitions, so the same
//! document always yields the same code.
//!
//! Decoding is strict about shape and lenient about layout:
//! - ASCII whitespace anywhere in the code is ignored (pasted codes wrap)
//! - the JSON must be an object holding at least one of `todos`,
//!   `projects`, `notes`, `reminders`; absent collections are empty
//! - unknown fields are ignored
//! - ids must be unique within each collection
//!
//! ## Usage
//!
//! ```
//! use taskmaster_codec::{decode, encode};
//! use taskmaster_core::{Priority, Todo, TransferDocument};
//!
//! let mut todo = Todo::new("buy milk", Priority::Low);
//! todo.id = 1;
//! let document = TransferDocument {
//!     todos: vec![todo],
//!     ..TransferDocument::default()
//! };
//!
//! let code = encode(&document).unwrap();
//! assert_eq!(decode(&code).unwrap(), document);
//! assert!(decode("not a code").is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod validate;

pub use decoder::decode;
pub use encoder::{encode, encode_snapshot, to_json, to_json_pretty};
pub use error::{CodecError, CodecResult};
pub use taskmaster_core::TransferDocument;
pub use validate::{parse_document, validate, COLLECTION_KEYS};
