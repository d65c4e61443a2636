//! The full application state and its transferable subset.

use super::enums::Theme;
use super::{Note, Project, Reminder, Todo};
use crate::id::is_valid_id;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One field of the snapshot. Each field is persisted under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SnapshotField {
    /// The notes collection.
    Notes,
    /// The todos collection.
    Todos,
    /// The projects collection.
    Projects,
    /// The reminders collection.
    Reminders,
    /// The display theme.
    Theme,
}

impl SnapshotField {
    /// Every field, in persistence order.
    pub const ALL: [SnapshotField; 5] = [
        SnapshotField::Notes,
        SnapshotField::Todos,
        SnapshotField::Projects,
        SnapshotField::Reminders,
        SnapshotField::Theme,
    ];

    /// The four record collections.
    pub const COLLECTIONS: [SnapshotField; 4] = [
        SnapshotField::Notes,
        SnapshotField::Todos,
        SnapshotField::Projects,
        SnapshotField::Reminders,
    ];

    /// Durable storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            SnapshotField::Notes => "notes",
            SnapshotField::Todos => "todos",
            SnapshotField::Projects => "projects",
            SnapshotField::Reminders => "reminders",
            SnapshotField::Theme => "theme",
        }
    }
}

impl fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The document moved between devices: every collection, no theme.
///
/// Field order is fixed, which keeps encoded output deterministic.
/// Absent collections deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDocument {
    /// Todos.
    #[serde(default)]
    pub todos: Vec<Todo>,
    /// Projects.
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Notes.
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Reminders.
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

impl TransferDocument {
    /// Returns true if every collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
            && self.projects.is_empty()
            && self.notes.is_empty()
            && self.reminders.is_empty()
    }
}

/// The complete application state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Notes.
    pub notes: Vec<Note>,
    /// Todos.
    pub todos: Vec<Todo>,
    /// Projects.
    pub projects: Vec<Project>,
    /// Reminders.
    pub reminders: Vec<Reminder>,
    /// Display theme. Device-local; never transferred.
    pub theme: Theme,
}

impl Snapshot {
    /// Builds a snapshot from a transferred document and a local theme.
    #[must_use]
    pub fn from_document(document: TransferDocument, theme: Theme) -> Self {
        Self {
            notes: document.notes,
            todos: document.todos,
            projects: document.projects,
            reminders: document.reminders,
            theme,
        }
    }

    /// Copies the transferable part of the snapshot.
    #[must_use]
    pub fn to_document(&self) -> TransferDocument {
        TransferDocument {
            todos: self.todos.clone(),
            projects: self.projects.clone(),
            notes: self.notes.clone(),
            reminders: self.reminders.clone(),
        }
    }

    /// Largest valid id in any collection, or 0 when there is none.
    #[must_use]
    pub fn max_id(&self) -> i64 {
        let notes = self.notes.iter().map(|n| n.id);
        let todos = self.todos.iter().map(|t| t.id);
        let projects = self.projects.iter().map(|p| p.id);
        let reminders = self.reminders.iter().map(|r| r.id);
        notes
            .chain(todos)
            .chain(projects)
            .chain(reminders)
            .filter(|id| is_valid_id(*id))
            .max()
            .unwrap_or(0)
    }

    /// Dashboard counts.
    #[must_use]
    pub fn counts(&self) -> SnapshotCounts {
        SnapshotCounts {
            notes: self.notes.len(),
            todos: self.todos.len(),
            projects: self.projects.len(),
            reminders: self.reminders.len(),
            open_todos: self.todos.iter().filter(|t| !t.completed).count(),
            open_reminders: self.reminders.iter().filter(|r| !r.completed).count(),
        }
    }

    /// Looks up a project.
    #[must_use]
    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Resolves a project's todo list in list order, skipping dangling ids.
    ///
    /// Unknown projects resolve to an empty list.
    #[must_use]
    pub fn project_todos(&self, project_id: i64) -> Vec<&Todo> {
        let Some(project) = self.project(project_id) else {
            return Vec::new();
        };
        project
            .todos
            .iter()
            .filter_map(|id| self.todos.iter().find(|t| t.id == *id))
            .collect()
    }

    /// Resolves a project's note list in list order, skipping dangling ids.
    #[must_use]
    pub fn project_notes(&self, project_id: i64) -> Vec<&Note> {
        let Some(project) = self.project(project_id) else {
            return Vec::new();
        };
        project
            .notes
            .iter()
            .filter_map(|id| self.notes.iter().find(|n| n.id == *id))
            .collect()
    }

    /// Lists project references that point at missing records.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let note_ids: HashSet<i64> = self.notes.iter().map(|n| n.id).collect();
        let todo_ids: HashSet<i64> = self.todos.iter().map(|t| t.id).collect();

        let mut dangling = Vec::new();
        for project in &self.projects {
            for id in project.notes.iter().filter(|id| !note_ids.contains(id)) {
                dangling.push(DanglingReference {
                    project_id: project.id,
                    kind: ReferenceKind::Note,
                    id: *id,
                });
            }
            for id in project.todos.iter().filter(|id| !todo_ids.contains(id)) {
                dangling.push(DanglingReference {
                    project_id: project.id,
                    kind: ReferenceKind::Todo,
                    id: *id,
                });
            }
        }
        dangling
    }

    /// Removes every dangling project reference and returns what was removed.
    pub fn prune_dangling_references(&mut self) -> Vec<DanglingReference> {
        let removed = self.dangling_references();
        if removed.is_empty() {
            return removed;
        }

        let note_ids: HashSet<i64> = self.notes.iter().map(|n| n.id).collect();
        let todo_ids: HashSet<i64> = self.todos.iter().map(|t| t.id).collect();
        for project in &mut self.projects {
            project.notes.retain(|id| note_ids.contains(id));
            project.todos.retain(|id| todo_ids.contains(id));
        }
        removed
    }
}

/// Which list a dangling reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// `Project::notes`.
    Note,
    /// `Project::todos`.
    Todo,
}

/// A project list entry whose target does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingReference {
    /// The project holding the reference.
    pub project_id: i64,
    /// The list holding the reference.
    pub kind: ReferenceKind,
    /// The missing id.
    pub id: i64,
}

/// Per-collection sizes shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCounts {
    /// Notes.
    pub notes: usize,
    /// Todos.
    pub todos: usize,
    /// Projects.
    pub projects: usize,
    /// Reminders.
    pub reminders: usize,
    /// Todos not yet completed.
    pub open_todos: usize,
    /// Reminders not yet completed.
    pub open_reminders: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NoteCategory, Priority};

    fn snapshot_with_dangling_todo() -> Snapshot {
        let mut todo = Todo::new("write report", Priority::High);
        todo.id = 1;
        todo.completed = true;
        let mut note = Note::new("outline", "intro", NoteCategory::Work);
        note.id = 2;
        let mut project = Project::new("Q2", "");
        project.id = 10;
        project.todos = vec![1, 99];
        project.notes = vec![2];
        Snapshot {
            notes: vec![note],
            todos: vec![todo],
            projects: vec![project],
            ..Snapshot::default()
        }
    }

    #[test]
    fn field_keys() {
        let keys: Vec<_> = SnapshotField::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys, ["notes", "todos", "projects", "reminders", "theme"]);
    }

    #[test]
    fn document_drops_theme() {
        let mut snapshot = snapshot_with_dangling_todo();
        snapshot.theme = Theme::Dark;
        let rebuilt = Snapshot::from_document(snapshot.to_document(), Theme::Dark);
        assert_eq!(rebuilt, snapshot);
        assert_eq!(
            Snapshot::from_document(snapshot.to_document(), Theme::Light).theme,
            Theme::Light
        );
    }

    #[test]
    fn document_serializes_in_fixed_order() {
        let json = serde_json::to_string(&TransferDocument::default()).unwrap();
        assert_eq!(json, r#"{"todos":[],"projects":[],"notes":[],"reminders":[]}"#);
    }

    #[test]
    fn dangling_ids_are_skipped() {
        let snapshot = snapshot_with_dangling_todo();
        let todos: Vec<i64> = snapshot.project_todos(10).iter().map(|t| t.id).collect();
        assert_eq!(todos, vec![1]);
        assert_eq!(snapshot.project_notes(10).len(), 1);
        assert!(snapshot.project_todos(404).is_empty());
    }

    #[test]
    fn prune_removes_only_dangling() {
        let mut snapshot = snapshot_with_dangling_todo();
        assert_eq!(
            snapshot.dangling_references(),
            vec![DanglingReference {
                project_id: 10,
                kind: ReferenceKind::Todo,
                id: 99
            }]
        );
        let removed = snapshot.prune_dangling_references();
        assert_eq!(removed.len(), 1);
        assert_eq!(snapshot.projects[0].todos, vec![1]);
        assert!(snapshot.dangling_references().is_empty());
        assert!(snapshot.prune_dangling_references().is_empty());
    }

    #[test]
    fn counts_and_max_id() {
        let snapshot = snapshot_with_dangling_todo();
        let counts = snapshot.counts();
        assert_eq!(counts.todos, 1);
        assert_eq!(counts.open_todos, 0);
        assert_eq!(counts.projects, 1);
        assert_eq!(snapshot.max_id(), 10);
        assert_eq!(Snapshot::default().max_id(), 0);
    }

    #[test]
    fn max_id_ignores_out_of_range_ids() {
        let mut snapshot = snapshot_with_dangling_todo();
        snapshot.todos[0].id = i64::MAX;
        snapshot.notes[0].id = -3;
        assert_eq!(snapshot.max_id(), 10);
    }
}
