//! # Taskmaster Storage
//!
//! Durable key-value storage for Taskmaster.
//!
//! This crate provides the lowest-level persistence abstraction. Stores are
//! **opaque byte maps**: they do not interpret the documents they hold.
//! Taskmaster keeps one JSON document per top-level field (`notes`, `todos`,
//! `projects`, `reminders`, `theme`), so the key space is tiny and flat.
//!
//! ## Design Principles
//!
//! - Stores are simple keyed byte maps (get, put, remove, flush)
//! - No knowledge of entity schemas or JSON
//! - Must be `Send + Sync` so the owning store can live behind `Arc`
//! - A `put` either fully replaces the previous value or leaves it intact
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral sessions
//! - [`FileStore`] - One file per key inside a locked data directory
//!
//! ## Example
//!
//! ```rust
//! use taskmaster_storage::{KeyValueStore, InMemoryStore};
//!
//! let mut store = InMemoryStore::new();
//! store.put("theme", b"\"dark\"").unwrap();
//! assert_eq!(store.get("theme").unwrap().as_deref(), Some(&b"\"dark\""[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::{validate_key, KeyValueStore};
pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
