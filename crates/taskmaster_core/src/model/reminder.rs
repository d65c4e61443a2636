//! Reminder record.

use super::entity::{require_text, Entity};
use super::enums::{Priority, Recurrence};
use super::snapshot::{Snapshot, SnapshotField};
use crate::wire::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dated reminder.
///
/// `datetime` is kept exactly as entered (usually `YYYY-MM-DDTHH:MM` from a
/// local date-time input) so it survives every round trip byte for byte.
/// Use [`Reminder::scheduled_at`] for date arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Identifier, unique within reminders.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// When the reminder fires, as entered.
    pub datetime: String,
    /// Whether the reminder has been dealt with.
    #[serde(default)]
    pub completed: bool,
    /// Priority.
    #[serde(default)]
    pub priority: Priority,
    /// Recurrence.
    #[serde(default, rename = "recurring")]
    pub recurrence: Recurrence,
}

impl Reminder {
    /// Creates an unsaved, open, non-recurring reminder.
    pub fn new(
        title: impl Into<String>,
        datetime: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            datetime: datetime.into(),
            completed: false,
            priority: Priority::default(),
            recurrence: Recurrence::None,
        }
    }

    /// Sets the recurrence.
    #[must_use]
    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Parses `datetime`. Returns `None` when it is not a recognizable
    /// timestamp.
    #[must_use]
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.datetime).ok()
    }
}

impl Entity for Reminder {
    const FIELD: SnapshotField = SnapshotField::Reminders;
    const KIND: &'static str = "reminder";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn collection(snapshot: &Snapshot) -> &[Self] {
        &snapshot.reminders
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.reminders
    }

    fn validate(&self) -> Result<(), String> {
        require_text("title", &self.title)?;
        require_text("datetime", &self.datetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn recurrence_uses_legacy_field_name() {
        let reminder = Reminder::new("Sync", "2024-03-20T10:00", "")
            .with_recurrence(Recurrence::Weekly);
        let json = serde_json::to_value(&reminder).unwrap();
        assert_eq!(json["recurring"], "weekly");
        assert!(json.get("recurrence").is_none());
    }

    #[test]
    fn old_documents_default_priority_and_recurrence() {
        let reminder: Reminder = serde_json::from_str(
            r#"{"id":1,"title":"Call","datetime":"2024-03-20T10:00","description":"","completed":false}"#,
        )
        .unwrap();
        assert_eq!(reminder.priority, Priority::Medium);
        assert_eq!(reminder.recurrence, Recurrence::None);
    }

    #[test]
    fn scheduled_at_parses_local_input() {
        let reminder = Reminder::new("Call", "2024-03-20T10:00", "");
        assert_eq!(
            reminder.scheduled_at(),
            Some(Utc.with_ymd_and_hms(2024, 3, 20, 10, 0, 0).unwrap())
        );
        assert_eq!(Reminder::new("Call", "soon", "").scheduled_at(), None);
    }
}
