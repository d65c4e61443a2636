//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random records and transfer
//! documents that satisfy the model's invariants: non-blank titles,
//! unique ids per collection and timestamps that survive the wire format.

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use taskmaster_core::{
    Note, NoteCategory, Priority, Project, ProjectStatus, Recurrence, Reminder, Snapshot, Theme,
    Todo, TransferDocument,
};

/// 2000-01-01T00:00:00Z in milliseconds.
const MIN_MILLIS: i64 = 946_684_800_000;
/// 2100-01-01T00:00:00Z in milliseconds.
const MAX_MILLIS: i64 = 4_102_444_800_000;

/// Strategy for generating non-blank titles.
pub fn title_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9][A-Za-z0-9 ,.!?-]{0,31}").expect("Invalid regex")
}

/// Strategy for generating free text, including newlines and non-ASCII.
pub fn body_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9\u{e9}\u{4e2d}][A-Za-z0-9#*\\- \n\u{e9}\u{4e2d}]{0,119}")
        .expect("Invalid regex")
}

/// Strategy for generating millisecond-precision UTC timestamps.
pub fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (MIN_MILLIS..MAX_MILLIS)
        .prop_map(|millis| DateTime::from_timestamp_millis(millis).unwrap_or_default())
}

/// Strategy for generating reminder datetimes in `YYYY-MM-DDTHH:MM` form.
pub fn local_datetime_strategy() -> impl Strategy<Value = String> {
    (2000u32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(
        |(year, month, day, hour, minute)| {
            format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}")
        },
    )
}

/// Strategy for generating priorities.
pub fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
}

/// Strategy for generating note categories.
pub fn category_strategy() -> impl Strategy<Value = NoteCategory> {
    prop_oneof![
        Just(NoteCategory::Personal),
        Just(NoteCategory::Work),
        Just(NoteCategory::Ideas)
    ]
}

/// Strategy for generating project statuses.
pub fn status_strategy() -> impl Strategy<Value = ProjectStatus> {
    prop_oneof![
        Just(ProjectStatus::NotStarted),
        Just(ProjectStatus::InProgress),
        Just(ProjectStatus::Completed)
    ]
}

/// Strategy for generating recurrences.
pub fn recurrence_strategy() -> impl Strategy<Value = Recurrence> {
    prop_oneof![
        Just(Recurrence::None),
        Just(Recurrence::Daily),
        Just(Recurrence::Weekly),
        Just(Recurrence::Monthly)
    ]
}

/// Strategy for generating themes.
pub fn theme_strategy() -> impl Strategy<Value = Theme> {
    prop_oneof![Just(Theme::Light), Just(Theme::Dark)]
}

/// Strategy for generating notes. Ids are left at 0.
pub fn note_strategy() -> impl Strategy<Value = Note> {
    (
        title_strategy(),
        body_strategy(),
        category_strategy(),
        prop::option::of(1i64..100),
        timestamp_strategy(),
        prop::option::of(Just("bg-blue-100".to_string())),
    )
        .prop_map(|(title, content, category, project_id, date, color)| Note {
            id: 0,
            title,
            content,
            category,
            project_id,
            date,
            color,
        })
}

/// Strategy for generating todos. Ids are left at 0.
pub fn todo_strategy() -> impl Strategy<Value = Todo> {
    (
        title_strategy(),
        any::<bool>(),
        priority_strategy(),
        prop::option::of(timestamp_strategy()),
        prop::option::of(1i64..100),
    )
        .prop_map(|(title, completed, priority, due_date, project_id)| Todo {
            id: 0,
            title,
            completed,
            priority,
            due_date,
            project_id,
        })
}

/// Strategy for generating projects. Ids are left at 0.
///
/// Note and todo lists hold arbitrary small ids, so some of them will
/// dangle once placed in a document.
pub fn project_strategy() -> impl Strategy<Value = Project> {
    (
        title_strategy(),
        prop::string::string_regex("[A-Za-z ]{0,40}").expect("Invalid regex"),
        status_strategy(),
        timestamp_strategy(),
        prop::collection::vec(1i64..20, 0..4),
        prop::collection::vec(1i64..20, 0..6),
    )
        .prop_map(|(title, description, status, date, notes, todos)| Project {
            id: 0,
            title,
            description,
            status,
            date,
            color: taskmaster_core::model::DEFAULT_PROJECT_COLOR.to_string(),
            notes,
            todos,
        })
}

/// Strategy for generating reminders. Ids are left at 0.
pub fn reminder_strategy() -> impl Strategy<Value = Reminder> {
    (
        title_strategy(),
        prop::string::string_regex("[A-Za-z \n-]{0,40}").expect("Invalid regex"),
        local_datetime_strategy(),
        any::<bool>(),
        priority_strategy(),
        recurrence_strategy(),
    )
        .prop_map(
            |(title, description, datetime, completed, priority, recurrence)| Reminder {
                id: 0,
                title,
                description,
                datetime,
                completed,
                priority,
                recurrence,
            },
        )
}

/// Strategy for generating transfer documents with unique ids per
/// collection.
pub fn document_strategy() -> impl Strategy<Value = TransferDocument> {
    (
        prop::collection::vec(todo_strategy(), 0..8),
        prop::collection::vec(project_strategy(), 0..4),
        prop::collection::vec(note_strategy(), 0..6),
        prop::collection::vec(reminder_strategy(), 0..4),
    )
        .prop_map(|(mut todos, mut projects, mut notes, mut reminders)| {
            number(&mut todos, |t, id| t.id = id);
            number(&mut projects, |p, id| p.id = id);
            number(&mut notes, |n, id| n.id = id);
            number(&mut reminders, |r, id| r.id = id);
            TransferDocument {
                todos,
                projects,
                notes,
                reminders,
            }
        })
}

/// Strategy for generating complete snapshots.
pub fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    (document_strategy(), theme_strategy())
        .prop_map(|(document, theme)| Snapshot::from_document(document, theme))
}

fn number<T>(items: &mut [T], mut set_id: impl FnMut(&mut T, i64)) {
    for (id, item) in (1i64..).zip(items.iter_mut()) {
        set_id(item, id);
    }
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
