//! # Taskmaster Core
//!
//! Data model, entity store and persistence for Taskmaster.
//!
//! This crate provides:
//! - The four record types (notes, todos, projects, reminders) and the
//!   [`Snapshot`] that bundles them with the display theme
//! - [`EntityStore`], the single authoritative in-memory holder of a snapshot
//! - [`PersistenceAdapter`], which hydrates the store at startup and saves
//!   every change to a [`taskmaster_storage::KeyValueStore`]
//! - A change feed for observers
//!
//! ## Key Invariants
//!
//! - Identifiers are unique within their own collection
//! - Snapshot replacement is all-or-nothing
//! - Project note/todo lists are soft references; dangling ids are tolerated
//!   and filtered at read time
//!
//! ## Usage
//!
//! ```
//! use taskmaster_core::{EntityStore, Priority, Todo};
//!
//! let store = EntityStore::in_memory();
//! let todo = store.add(Todo::new("buy milk", Priority::Low)).unwrap();
//! store.toggle_todo(todo.id).unwrap();
//! assert!(store.get::<Todo>(todo.id).unwrap().completed);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod change_feed;
mod config;
mod error;
mod id;
pub mod model;
mod persistence;
mod repair;
mod sample;
mod store;
pub mod wire;

pub use change_feed::{ChangeFeed, ChangeKind, StoreEvent};
pub use config::StoreConfig;
pub use error::{CoreError, CoreResult};
pub use id::{is_valid_id, IdAllocator, MAX_ID};
pub use model::{
    DanglingReference, Entity, Note, NoteCategory, Priority, Project, ProjectProgress,
    ProjectStatus, Recurrence, ReferenceKind, Reminder, Snapshot, SnapshotCounts, SnapshotField,
    Theme, Todo, TransferDocument,
};
pub use persistence::PersistenceAdapter;
pub use sample::sample_snapshot;
pub use store::EntityStore;

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
