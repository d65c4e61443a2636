//! The authoritative in-memory snapshot holder.

use crate::change_feed::{ChangeFeed, ChangeKind, StoreEvent};
use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::id::IdAllocator;
use crate::model::{
    DanglingReference, Entity, Note, Project, ProjectProgress, ProjectStatus, Reminder, Snapshot,
    SnapshotCounts, SnapshotField, Theme, Todo, TransferDocument,
};
use crate::persistence::{encode_fields, PersistenceAdapter};
use crate::repair::repair_ids;
use crate::sample::sample_snapshot;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::mpsc::Receiver;
use taskmaster_storage::FileStore;
use tracing::{debug, info};

/// Holds the four collections and the theme.
///
/// Every update runs under one write lock, so readers see either the state
/// before or after it, never a mix. After the state changes the affected
/// fields are written to the [`PersistenceAdapter`] and a [`StoreEvent`]
/// is emitted, both before the call returns. Event sequence numbers follow
/// the order in which updates reach storage.
///
/// Ids are kept unique and in range within each collection: records that
/// arrive with a clashing id, whether hydrated or written directly, are
/// given a fresh one.
///
/// The store is `Send + Sync`; share it with `Arc`.
pub struct EntityStore {
    state: RwLock<Snapshot>,
    persistence: PersistenceAdapter,
    ids: IdAllocator,
    feed: ChangeFeed,
    dirty: Mutex<BTreeSet<SnapshotField>>,
    config: StoreConfig,
}

impl EntityStore {
    /// Creates an empty store backed by memory.
    pub fn in_memory() -> Self {
        Self::new(StoreConfig::default())
    }

    /// Creates an empty store backed by memory with the given configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self::open(PersistenceAdapter::in_memory(), config)
    }

    /// Hydrates a store from durable storage.
    ///
    /// Clashing ids in the stored collections are repaired and the repaired
    /// collections written back.
    pub fn open(persistence: PersistenceAdapter, config: StoreConfig) -> Self {
        let mut snapshot = persistence.hydrate();
        let ids = IdAllocator::starting_after(snapshot.max_id());
        let repaired = repair_ids(&mut snapshot, &SnapshotField::COLLECTIONS, &ids);

        let mut dirty = BTreeSet::new();
        if !repaired.is_empty() {
            info!(fields = ?repaired, "repaired stored ids");
            if config.persist_on_change {
                persistence.save_fields(&snapshot, &repaired);
            } else {
                dirty.extend(repaired);
            }
        }

        Self {
            state: RwLock::new(snapshot),
            persistence,
            ids,
            feed: ChangeFeed::with_max_history(config.max_event_history),
            dirty: Mutex::new(dirty),
            config,
        }
    }

    /// Opens a store over a [`FileStore`] data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or is already
    /// locked by another process.
    pub fn open_dir(dir: &Path, config: StoreConfig) -> CoreResult<Self> {
        let backend = FileStore::open(dir)?;
        Ok(Self::open(PersistenceAdapter::new(backend), config))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the persistence adapter.
    pub fn persistence(&self) -> &PersistenceAdapter {
        &self.persistence
    }

    /// Returns the change feed.
    pub fn change_feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Subscribes to future store events.
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        self.feed.subscribe()
    }

    // ========================================================================
    // Snapshot access
    // ========================================================================

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        self.state.read().clone()
    }

    /// Runs `f` against the current state without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        f(&self.state.read())
    }

    /// Swaps in a complete snapshot, theme included.
    pub fn replace_snapshot(&self, snapshot: Snapshot) {
        info!(
            notes = snapshot.notes.len(),
            todos = snapshot.todos.len(),
            projects = snapshot.projects.len(),
            reminders = snapshot.reminders.len(),
            "replacing snapshot"
        );
        self.apply(ChangeKind::Replaced, |state| {
            *state = snapshot;
            ((), SnapshotField::ALL.to_vec())
        });
    }

    /// Swaps in every collection from a transferred document and keeps the
    /// local theme.
    pub fn replace_collections(&self, document: TransferDocument) {
        info!(
            notes = document.notes.len(),
            todos = document.todos.len(),
            projects = document.projects.len(),
            reminders = document.reminders.len(),
            "replacing collections"
        );
        self.apply(ChangeKind::Replaced, |state| {
            let theme = state.theme;
            *state = Snapshot::from_document(document, theme);
            ((), SnapshotField::COLLECTIONS.to_vec())
        });
    }

    /// Replaces the collections with the demo content.
    pub fn load_sample_data(&self) {
        self.replace_collections(sample_snapshot().to_document());
    }

    // ========================================================================
    // Per-collection mutation
    // ========================================================================

    /// Applies `updater` to the notes collection.
    pub fn mutate_notes<R>(&self, updater: impl FnOnce(&mut Vec<Note>) -> R) -> R {
        self.apply(ChangeKind::Mutated, |state| {
            (updater(&mut state.notes), vec![SnapshotField::Notes])
        })
    }

    /// Applies `updater` to the todos collection.
    pub fn mutate_todos<R>(&self, updater: impl FnOnce(&mut Vec<Todo>) -> R) -> R {
        self.apply(ChangeKind::Mutated, |state| {
            (updater(&mut state.todos), vec![SnapshotField::Todos])
        })
    }

    /// Applies `updater` to the projects collection.
    pub fn mutate_projects<R>(&self, updater: impl FnOnce(&mut Vec<Project>) -> R) -> R {
        self.apply(ChangeKind::Mutated, |state| {
            (updater(&mut state.projects), vec![SnapshotField::Projects])
        })
    }

    /// Applies `updater` to the reminders collection.
    pub fn mutate_reminders<R>(&self, updater: impl FnOnce(&mut Vec<Reminder>) -> R) -> R {
        self.apply(ChangeKind::Mutated, |state| {
            (updater(&mut state.reminders), vec![SnapshotField::Reminders])
        })
    }

    // ========================================================================
    // Theme
    // ========================================================================

    /// Returns the current theme.
    pub fn theme(&self) -> Theme {
        self.state.read().theme
    }

    /// Sets the theme. Setting the current theme is a no-op.
    pub fn set_theme(&self, theme: Theme) {
        self.apply(ChangeKind::Mutated, |state| {
            if state.theme == theme {
                return ((), Vec::new());
            }
            state.theme = theme;
            ((), vec![SnapshotField::Theme])
        });
    }

    /// Flips between light and dark and returns the new theme.
    pub fn toggle_theme(&self) -> Theme {
        self.apply(ChangeKind::Mutated, |state| {
            state.theme = state.theme.toggled();
            (state.theme, vec![SnapshotField::Theme])
        })
    }

    // ========================================================================
    // Entity operations
    // ========================================================================

    /// Validates `entity`, assigns it a fresh id and appends it.
    ///
    /// Returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntity` if validation fails or `IdSpaceExhausted` if
    /// no id is left.
    pub fn add<T: Entity>(&self, mut entity: T) -> CoreResult<T> {
        validate(&entity)?;
        self.try_apply(ChangeKind::Mutated, |state| {
            entity.set_id(self.ids.next()?);
            T::collection_mut(state).push(entity.clone());
            Ok((entity, vec![T::FIELD]))
        })
    }

    /// Returns the record with the given id.
    pub fn get<T: Entity>(&self, id: i64) -> Option<T> {
        self.read(|state| T::collection(state).iter().find(|e| e.id() == id).cloned())
    }

    /// Returns every record of one kind.
    pub fn list<T: Entity>(&self) -> Vec<T> {
        self.read(|state| T::collection(state).to_vec())
    }

    /// Replaces the record whose id matches `entity`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntity` if validation fails or `EntityNotFound` if no
    /// record has that id.
    pub fn update<T: Entity>(&self, entity: T) -> CoreResult<()> {
        validate(&entity)?;
        self.try_apply(ChangeKind::Mutated, |state| {
            let slot = T::collection_mut(state)
                .iter_mut()
                .find(|e| e.id() == entity.id())
                .ok_or_else(|| CoreError::not_found(T::KIND, entity.id()))?;
            *slot = entity;
            Ok(((), vec![T::FIELD]))
        })
    }

    /// Removes a record and unlinks it from every project.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if no record has that id.
    pub fn delete<T: Entity>(&self, id: i64) -> CoreResult<T> {
        self.try_apply(ChangeKind::Mutated, |state| {
            let collection = T::collection_mut(state);
            let position = collection
                .iter()
                .position(|e| e.id() == id)
                .ok_or_else(|| CoreError::not_found(T::KIND, id))?;
            let removed = collection.remove(position);

            let mut fields = vec![T::FIELD];
            if T::unlink(state, id) {
                fields.push(SnapshotField::Projects);
            }
            Ok((removed, fields))
        })
    }

    /// Flips a todo's completion and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if the todo does not exist.
    pub fn toggle_todo(&self, id: i64) -> CoreResult<bool> {
        self.try_apply(ChangeKind::Mutated, |state| {
            let todo = find_mut(&mut state.todos, id)?;
            todo.completed = !todo.completed;
            Ok((todo.completed, vec![SnapshotField::Todos]))
        })
    }

    /// Flips a reminder's completion and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if the reminder does not exist.
    pub fn toggle_reminder(&self, id: i64) -> CoreResult<bool> {
        self.try_apply(ChangeKind::Mutated, |state| {
            let reminder = find_mut(&mut state.reminders, id)?;
            reminder.completed = !reminder.completed;
            Ok((reminder.completed, vec![SnapshotField::Reminders]))
        })
    }

    /// Sets a project's status.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if the project does not exist.
    pub fn update_project_status(&self, id: i64, status: ProjectStatus) -> CoreResult<()> {
        self.try_apply(ChangeKind::Mutated, |state| {
            find_mut(&mut state.projects, id)?.status = status;
            Ok(((), vec![SnapshotField::Projects]))
        })
    }

    /// Creates a todo inside a project and appends it to the project's list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntity` if validation fails or `EntityNotFound` if the
    /// project does not exist. Nothing changes on error.
    pub fn add_todo_to_project(&self, project_id: i64, mut todo: Todo) -> CoreResult<Todo> {
        validate(&todo)?;
        self.try_apply(ChangeKind::Mutated, |state| {
            let project = find_mut(&mut state.projects, project_id)?;
            todo.id = self.ids.next()?;
            todo.project_id = Some(project_id);
            project.todos.push(todo.id);
            state.todos.push(todo.clone());
            Ok((todo, vec![SnapshotField::Todos, SnapshotField::Projects]))
        })
    }

    /// Creates a note inside a project and appends it to the project's list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntity` if validation fails or `EntityNotFound` if the
    /// project does not exist. Nothing changes on error.
    pub fn add_note_to_project(&self, project_id: i64, mut note: Note) -> CoreResult<Note> {
        validate(&note)?;
        self.try_apply(ChangeKind::Mutated, |state| {
            let project = find_mut(&mut state.projects, project_id)?;
            note.id = self.ids.next()?;
            note.project_id = Some(project_id);
            project.notes.push(note.id);
            state.notes.push(note.clone());
            Ok((note, vec![SnapshotField::Notes, SnapshotField::Projects]))
        })
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    /// Resolves a project's todos in list order, skipping dangling ids.
    pub fn project_todos(&self, project_id: i64) -> Vec<Todo> {
        self.read(|state| state.project_todos(project_id).into_iter().cloned().collect())
    }

    /// Resolves a project's notes in list order, skipping dangling ids.
    pub fn project_notes(&self, project_id: i64) -> Vec<Note> {
        self.read(|state| state.project_notes(project_id).into_iter().cloned().collect())
    }

    /// Counts completed todos of a project. Dangling ids are not counted.
    pub fn project_progress(&self, project_id: i64) -> ProjectProgress {
        self.read(|state| {
            let todos = state.project_todos(project_id);
            ProjectProgress {
                completed: todos.iter().filter(|t| t.completed).count(),
                total: todos.len(),
            }
        })
    }

    /// Dashboard counts.
    pub fn counts(&self) -> SnapshotCounts {
        self.read(Snapshot::counts)
    }

    /// Lists project references that point at missing records.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        self.read(Snapshot::dangling_references)
    }

    /// Removes dangling project references and returns them.
    pub fn prune_dangling_references(&self) -> Vec<DanglingReference> {
        self.apply(ChangeKind::Mutated, |state| {
            let removed = state.prune_dangling_references();
            let fields = if removed.is_empty() {
                Vec::new()
            } else {
                vec![SnapshotField::Projects]
            };
            (removed, fields)
        })
    }

    // ========================================================================
    // Durability
    // ========================================================================

    /// Writes any deferred fields and flushes the backend.
    ///
    /// With `persist_on_change` enabled there is never anything deferred and
    /// this only flushes.
    ///
    /// # Errors
    ///
    /// Returns the first write or flush failure. Fields that failed to write
    /// stay pending for the next flush.
    pub fn flush(&self) -> CoreResult<()> {
        let pending: Vec<SnapshotField> = std::mem::take(&mut *self.dirty.lock())
            .into_iter()
            .collect();
        if pending.is_empty() {
            return self.persistence.flush();
        }

        let state = self.state.read();
        let encoded = encode_fields(&state, &pending);
        let mut writer = self.persistence.lock_writer();
        drop(state);

        debug!(fields = pending.len(), "flushing deferred fields");
        writer.try_write(encoded).inspect_err(|_| {
            self.dirty.lock().extend(pending.iter().copied());
        })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Runs one update under the write lock, then persists and notifies.
    ///
    /// `update` returns its result plus the fields it changed; an empty list
    /// means nothing changed and nothing is written or emitted. Changed
    /// collections have their ids repaired before they are written.
    ///
    /// The event is emitted while the writer (or, when writes are deferred,
    /// the state lock) is still held, so sequence numbers match write order.
    fn apply<R>(
        &self,
        kind: ChangeKind,
        update: impl FnOnce(&mut Snapshot) -> (R, Vec<SnapshotField>),
    ) -> R {
        let mut state = self.state.write();
        let (value, fields) = update(&mut *state);
        if fields.is_empty() {
            return value;
        }
        self.ids.observe(state.max_id());
        let repaired = repair_ids(&mut state, &fields, &self.ids);
        if !repaired.is_empty() {
            debug!(fields = ?repaired, "repaired ids after update");
        }

        let event = if self.config.persist_on_change {
            let encoded = encode_fields(&state, &fields);
            let mut writer = self.persistence.lock_writer();
            drop(state);
            writer.write(encoded);
            self.feed.emit(kind, fields)
        } else {
            self.dirty.lock().extend(fields.iter().copied());
            let event = self.feed.emit(kind, fields);
            drop(state);
            event
        };

        debug!(sequence = event.sequence, kind = ?event.kind, fields = ?event.fields, "store updated");
        value
    }

    /// Like [`apply`](Self::apply) for updates that can fail. A failed
    /// update must leave the state untouched.
    fn try_apply<R>(
        &self,
        kind: ChangeKind,
        update: impl FnOnce(&mut Snapshot) -> CoreResult<(R, Vec<SnapshotField>)>,
    ) -> CoreResult<R> {
        self.apply(kind, |state| match update(state) {
            Ok((value, fields)) => (Ok(value), fields),
            Err(err) => (Err(err), Vec::new()),
        })
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("counts", &self.counts())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn validate<T: Entity>(entity: &T) -> CoreResult<()> {
    entity
        .validate()
        .map_err(|message| CoreError::invalid_entity(T::KIND, message))
}

fn find_mut<T: Entity>(items: &mut [T], id: i64) -> CoreResult<&mut T> {
    items
        .iter_mut()
        .find(|e| e.id() == id)
        .ok_or_else(|| CoreError::not_found(T::KIND, id))
}
