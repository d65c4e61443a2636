//! Record types and the snapshot that bundles them.
//!
//! JSON field names follow the documents the application has always written
//! (`projectId`, `dueDate`, `recurring`, ...), so backups and sync codes
//! produced by older builds remain readable.

mod entity;
mod enums;
mod note;
mod project;
mod reminder;
mod snapshot;
mod todo;

pub use entity::Entity;
pub use enums::{NoteCategory, Priority, ProjectStatus, Recurrence, Theme};
pub use note::Note;
pub use project::{Project, ProjectProgress, DEFAULT_PROJECT_COLOR};
pub use reminder::Reminder;
pub use snapshot::{
    DanglingReference, ReferenceKind, Snapshot, SnapshotCounts, SnapshotField, TransferDocument,
};
pub use todo::Todo;
