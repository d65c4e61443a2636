//! Todo record.

use super::entity::{require_text, Entity};
use super::enums::Priority;
use super::snapshot::{Snapshot, SnapshotField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task that can be checked off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Identifier, unique within todos.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// Priority.
    #[serde(default)]
    pub priority: Priority,
    /// Optional due date.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::wire::optional_timestamp"
    )]
    pub due_date: Option<DateTime<Utc>>,
    /// Owning project, if any. Weak reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
}

impl Todo {
    /// Creates an unsaved, open todo.
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: 0,
            title: title.into(),
            completed: false,
            priority,
            due_date: None,
            project_id: None,
        }
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the owning project.
    #[must_use]
    pub fn with_project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Returns true if the todo is open and its due date has passed.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}

impl Entity for Todo {
    const FIELD: SnapshotField = SnapshotField::Todos;
    const KIND: &'static str = "todo";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn collection(snapshot: &Snapshot) -> &[Self] {
        &snapshot.todos
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.todos
    }

    fn validate(&self) -> Result<(), String> {
        require_text("title", &self.title)
    }

    fn unlink(snapshot: &mut Snapshot, id: i64) -> bool {
        let mut changed = false;
        for project in &mut snapshot.projects {
            let before = project.todos.len();
            project.todos.retain(|todo_id| *todo_id != id);
            changed |= project.todos.len() != before;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn minimal_document() {
        let todo: Todo =
            serde_json::from_str(r#"{"id":1,"title":"buy milk","completed":false,"priority":"low"}"#)
                .unwrap();
        assert_eq!(todo.priority, Priority::Low);
        assert_eq!(todo.due_date, None);
        assert_eq!(todo.project_id, None);

        let json = serde_json::to_string(&todo).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"title":"buy milk","completed":false,"priority":"low"}"#
        );
    }

    #[test]
    fn blank_due_date_reads_as_none() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":2,"title":"x","completed":false,"priority":"medium","dueDate":""}"#,
        )
        .unwrap();
        assert_eq!(todo.due_date, None);
    }

    #[test]
    fn due_date_is_revived() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":3,"title":"x","completed":false,"priority":"high","dueDate":"2024-03-20T00:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(
            todo.due_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn overdue_only_when_open() {
        let due = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 21, 0, 0, 0).unwrap();
        let mut todo = Todo::new("x", Priority::Low).with_due_date(due);
        assert!(todo.is_overdue(later));
        todo.completed = true;
        assert!(!todo.is_overdue(later));
    }
}
