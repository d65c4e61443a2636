//! Note record.

use super::entity::{require_text, Entity};
use super::enums::NoteCategory;
use super::snapshot::{Snapshot, SnapshotField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-form note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Identifier, unique within notes.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Category.
    #[serde(default)]
    pub category: NoteCategory,
    /// Owning project, if any. Weak reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    /// Creation timestamp.
    #[serde(with = "crate::wire::timestamp")]
    pub date: DateTime<Utc>,
    /// Opaque display colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Note {
    /// Creates an unsaved note stamped with the current time.
    ///
    /// The id is assigned by the store on insert.
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: NoteCategory) -> Self {
        Self {
            id: 0,
            title: title.into(),
            content: content.into(),
            category,
            project_id: None,
            date: Utc::now(),
            color: None,
        }
    }

    /// Sets the owning project.
    #[must_use]
    pub fn with_project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Sets the display colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Entity for Note {
    const FIELD: SnapshotField = SnapshotField::Notes;
    const KIND: &'static str = "note";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn collection(snapshot: &Snapshot) -> &[Self] {
        &snapshot.notes
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.notes
    }

    fn validate(&self) -> Result<(), String> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }

    fn unlink(snapshot: &mut Snapshot, id: i64) -> bool {
        let mut changed = false;
        for project in &mut snapshot.projects {
            let before = project.notes.len();
            project.notes.retain(|note_id| *note_id != id);
            changed |= project.notes.len() != before;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let note = Note::new("Groceries", "eggs", NoteCategory::Personal);
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("projectId").is_none());
        assert!(json.get("color").is_none());
        assert_eq!(json["category"], "personal");
    }

    #[test]
    fn reads_legacy_document() {
        let json = r#"{
            "id": 1,
            "title": "Design System Guidelines",
            "content": "colors",
            "category": "work",
            "projectId": 1,
            "date": "2024-03-16T00:00:00.000Z",
            "color": "bg-blue-100"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.project_id, Some(1));
        assert_eq!(note.category, NoteCategory::Work);
        assert_eq!(note.color.as_deref(), Some("bg-blue-100"));
    }

    #[test]
    fn validation_requires_title_and_content() {
        assert!(Note::new(" ", "body", NoteCategory::Work).validate().is_err());
        assert!(Note::new("title", "", NoteCategory::Work).validate().is_err());
        assert!(Note::new("title", "body", NoteCategory::Work).validate().is_ok());
    }
}
