//! Project record.

use super::entity::{require_text, Entity};
use super::enums::ProjectStatus;
use super::snapshot::{Snapshot, SnapshotField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Colour given to projects created without one.
pub const DEFAULT_PROJECT_COLOR: &str = "from-blue-500 to-blue-600";

/// A project grouping notes and todos.
///
/// `notes` and `todos` are ordered id lists. They are advisory: an id may
/// refer to a record that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Identifier, unique within projects.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Status.
    #[serde(default)]
    pub status: ProjectStatus,
    /// Creation timestamp.
    #[serde(with = "crate::wire::timestamp")]
    pub date: DateTime<Utc>,
    /// Display colour.
    #[serde(default)]
    pub color: String,
    /// Ordered note ids.
    #[serde(default)]
    pub notes: Vec<i64>,
    /// Ordered todo ids.
    #[serde(default)]
    pub todos: Vec<i64>,
}

impl Project {
    /// Creates an unsaved, not-started project stamped with the current time.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            status: ProjectStatus::NotStarted,
            date: Utc::now(),
            color: DEFAULT_PROJECT_COLOR.to_string(),
            notes: Vec::new(),
            todos: Vec::new(),
        }
    }
}

impl Entity for Project {
    const FIELD: SnapshotField = SnapshotField::Projects;
    const KIND: &'static str = "project";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn collection(snapshot: &Snapshot) -> &[Self] {
        &snapshot.projects
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.projects
    }

    fn validate(&self) -> Result<(), String> {
        require_text("title", &self.title)
    }
}

/// Completion of a project's existing todos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectProgress {
    /// Completed todos.
    pub completed: usize,
    /// Todos that resolve to an existing record.
    pub total: usize,
}

impl ProjectProgress {
    /// Completion ratio in `0.0..=1.0`; an empty project counts as `0.0`.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_default_when_absent() {
        let project: Project = serde_json::from_str(
            r#"{"id":7,"title":"Garden","description":"","status":"in-progress","date":"2024-04-01T00:00:00.000Z"}"#,
        )
        .unwrap();
        assert!(project.notes.is_empty());
        assert!(project.todos.is_empty());
        assert_eq!(project.status, ProjectStatus::InProgress);
    }

    #[test]
    fn progress_ratio() {
        assert_eq!(ProjectProgress::default().ratio(), 0.0);
        let progress = ProjectProgress {
            completed: 1,
            total: 4,
        };
        assert!((progress.ratio() - 0.25).abs() < f64::EPSILON);
    }
}
