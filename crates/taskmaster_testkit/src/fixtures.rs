//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up entity stores
//! and common test scenarios.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskmaster_core::{EntityStore, PersistenceAdapter, StoreConfig};
use taskmaster_storage::InMemoryStore;
use tempfile::TempDir;

/// A test store with automatic cleanup.
///
/// The store sits behind an [`Arc`] so it can be handed to a sync
/// controller while the test keeps its own handle.
pub struct TestStore {
    store: Arc<EntityStore>,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(EntityStore::in_memory()),
            temp_dir: None,
        }
    }

    /// Creates an in-memory store holding the demo data.
    pub fn with_sample_data() -> Self {
        let fixture = Self::new();
        fixture.store.load_sample_data();
        fixture
    }

    /// Creates an in-memory store hydrated from raw stored values.
    ///
    /// Keys are snapshot field keys (`notes`, `todos`, ...) and values are
    /// the bytes a previous run would have written.
    pub fn with_stored<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Vec<u8>)>,
    {
        let persistence = PersistenceAdapter::new(InMemoryStore::with_entries(entries));
        Self {
            store: Arc::new(EntityStore::open(persistence, StoreConfig::default())),
            temp_dir: None,
        }
    }

    /// Creates an empty store persisted to a temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = EntityStore::open_dir(temp_dir.path(), StoreConfig::default())
            .expect("Failed to open file store");
        Self {
            store: Arc::new(store),
            temp_dir: Some(temp_dir),
        }
    }

    /// Returns the shared store handle.
    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    /// Returns the data directory if file-based, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self.temp_dir.as_ref().map(|d| d.path().to_path_buf())
    }

    /// Drops the store and opens a fresh one over the same directory.
    ///
    /// # Panics
    ///
    /// Panics if the fixture is in-memory or the directory cannot be reopened.
    pub fn reopen(self) -> Self {
        let temp_dir = self.temp_dir.expect("Only file stores can be reopened");
        drop(self.store);
        let store = EntityStore::open_dir(temp_dir.path(), StoreConfig::default())
            .expect("Failed to reopen file store");
        Self {
            store: Arc::new(store),
            temp_dir: Some(temp_dir),
        }
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestStore {
    type Target = EntityStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a temporary file-backed store.
///
/// # Example
///
/// ```
/// use taskmaster_core::{Priority, Todo};
/// use taskmaster_testkit::with_temp_store;
///
/// with_temp_store(|store| {
///     store.add(Todo::new("buy milk", Priority::Low)).unwrap();
///     assert_eq!(store.counts().todos, 1);
/// });
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&EntityStore) -> R,
{
    let fixture = TestStore::file();
    f(&fixture)
}

/// Runs a test with an in-memory store holding the demo data.
pub fn with_sample_store<F, R>(f: F) -> R
where
    F: FnOnce(&EntityStore) -> R,
{
    let fixture = TestStore::with_sample_data();
    f(&fixture)
}

/// Runs a test with a fresh temporary directory.
pub fn with_temp_dir<F, R>(f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    f(temp_dir.path())
}

/// Common test scenarios.
pub mod scenarios {
    use taskmaster_core::{
        EntityStore, Note, NoteCategory, Priority, Project, Recurrence, Reminder, Todo,
    };

    /// Creates a project with `todos` todos and one note, returning the
    /// project id. The first `completed` todos are marked done.
    pub fn project_with_todos(store: &EntityStore, todos: usize, completed: usize) -> i64 {
        let project = store
            .add(Project::new("Launch", "Ship the release"))
            .expect("Failed to add project");
        for i in 0..todos {
            let todo = store
                .add_todo_to_project(project.id, Todo::new(format!("task {i}"), Priority::Medium))
                .expect("Failed to add todo");
            if i < completed {
                store.toggle_todo(todo.id).expect("Failed to toggle todo");
            }
        }
        store
            .add_note_to_project(project.id, Note::new("plan", "steps", NoteCategory::Work))
            .expect("Failed to add note");
        project.id
    }

    /// Adds one record of every kind to the store.
    pub fn one_of_each(store: &EntityStore) {
        store
            .add(Note::new("idea", "write it down", NoteCategory::Ideas))
            .expect("Failed to add note");
        store
            .add(Todo::new("buy milk", Priority::Low))
            .expect("Failed to add todo");
        store
            .add(Project::new("Garden", "Spring planting"))
            .expect("Failed to add project");
        store
            .add(
                Reminder::new("standup", "2024-03-20T10:00", "daily sync")
                    .with_recurrence(Recurrence::Daily),
            )
            .expect("Failed to add reminder");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmaster_core::{Priority, Theme, Todo};

    #[test]
    fn memory_store_starts_empty() {
        let fixture = TestStore::new();
        assert_eq!(fixture.counts().todos, 0);
        assert!(fixture.path().is_none());
    }

    #[test]
    fn sample_store_has_demo_data() {
        with_sample_store(|store| {
            assert_eq!(store.counts().projects, 3);
            assert_eq!(store.counts().reminders, 2);
        });
    }

    #[test]
    fn stored_values_are_hydrated() {
        let fixture = TestStore::with_stored([
            ("theme", b"\"dark\"".to_vec()),
            ("todos", br#"[{"id":1,"title":"buy milk"}]"#.to_vec()),
            ("notes", b"garbage".to_vec()),
        ]);
        assert_eq!(fixture.theme(), Theme::Dark);
        assert_eq!(fixture.counts().todos, 1);
        assert_eq!(fixture.counts().notes, 0);
    }

    #[test]
    fn file_store_survives_reopen() {
        let fixture = TestStore::file();
        assert!(fixture.path().is_some());
        fixture.add(Todo::new("buy milk", Priority::Low)).unwrap();
        fixture.set_theme(Theme::Dark);

        let reopened = fixture.reopen();
        assert_eq!(reopened.counts().todos, 1);
        assert_eq!(reopened.theme(), Theme::Dark);
    }

    #[test]
    fn scenario_project_progress() {
        with_temp_store(|store| {
            let id = scenarios::project_with_todos(store, 4, 1);
            let progress = store.project_progress(id);
            assert_eq!(progress.completed, 1);
            assert_eq!(progress.total, 4);
            assert_eq!(store.project_notes(id).len(), 1);
        });
    }

    #[test]
    fn scenario_one_of_each() {
        with_temp_store(|store| {
            scenarios::one_of_each(store);
            let counts = store.counts();
            assert_eq!(
                (counts.notes, counts.todos, counts.projects, counts.reminders),
                (1, 1, 1, 1)
            );
        });
    }
}
