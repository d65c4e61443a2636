//! Demo content offered to new users.

use crate::model::{
    Note, NoteCategory, Priority, Project, ProjectStatus, Recurrence, Reminder, Snapshot, Todo,
};
use crate::wire::parse_timestamp;
use chrono::{DateTime, Utc};

/// Returns the demo snapshot: three projects with their todos, notes and
/// reminders.
///
/// Project lists intentionally mention ids that have no record (the demo
/// only ships the first project's content), so views must cope with
/// dangling references.
pub fn sample_snapshot() -> Snapshot {
    Snapshot {
        projects: vec![
            project(
                1,
                "Website Redesign",
                "Complete overhaul of company website with modern design and improved UX",
                ProjectStatus::InProgress,
                "2024-03-15",
                "from-blue-500 to-blue-600",
                vec![1, 2, 3],
                vec![1, 2, 3, 4, 5],
            ),
            project(
                2,
                "Mobile App Development",
                "Cross-platform mobile app using React Native with offline-first architecture",
                ProjectStatus::NotStarted,
                "2024-04-01",
                "from-purple-500 to-purple-600",
                vec![4, 5],
                vec![6, 7, 8],
            ),
            project(
                3,
                "Q2 Marketing Campaign",
                "Comprehensive digital marketing campaign across multiple channels",
                ProjectStatus::Completed,
                "2024-02-28",
                "from-emerald-500 to-emerald-600",
                vec![6],
                vec![9, 10],
            ),
        ],
        todos: vec![
            todo(1, "Create wireframes in Figma", true, Priority::High, "2024-03-20"),
            todo(2, "Implement responsive design system", false, Priority::High, "2024-03-25"),
            todo(3, "Optimize images and assets", false, Priority::Medium, "2024-03-28"),
            todo(4, "Set up CI/CD pipeline", false, Priority::High, "2024-03-30"),
            todo(5, "Write documentation", false, Priority::Medium, "2024-04-05"),
        ],
        notes: vec![
            Note {
                id: 1,
                title: "Design System Guidelines".into(),
                content: "# Brand Colors\n- Primary: #3B82F6\n- Secondary: #8B5CF6\n- Accent: #10B981\n\n# Typography\n- Headings: Geist Sans\n- Body: Inter\n\n# Components\n- Use rounded corners (border-radius: 12px)\n- Implement smooth transitions\n- Follow accessibility guidelines".into(),
                category: NoteCategory::Work,
                project_id: Some(1),
                date: date("2024-03-16"),
                color: Some("bg-blue-100".into()),
            },
            Note {
                id: 2,
                title: "Client Meeting Notes".into(),
                content: "## Key Requirements\n\n1. Modern, minimalist design\n2. Fast loading times\n3. Mobile-first approach\n4. Integration with existing CMS\n5. Analytics dashboard\n\n## Timeline\n- Design: 2 weeks\n- Development: 6 weeks\n- Testing: 2 weeks\n- Launch: April 15th".into(),
                category: NoteCategory::Work,
                project_id: Some(1),
                date: date("2024-03-17"),
                color: Some("bg-purple-100".into()),
            },
        ],
        reminders: vec![
            Reminder {
                id: 1,
                title: "Weekly Team Sync".into(),
                description: "Review progress on website redesign project\n- UI/UX updates\n- Performance metrics\n- Timeline review".into(),
                datetime: "2024-03-20T10:00".into(),
                completed: false,
                priority: Priority::High,
                recurrence: Recurrence::Weekly,
            },
            Reminder {
                id: 2,
                title: "Client Presentation".into(),
                description: "Present website redesign progress\n- Show mockups\n- Discuss feedback\n- Plan next steps".into(),
                datetime: "2024-03-25T14:00".into(),
                completed: false,
                priority: Priority::High,
                recurrence: Recurrence::None,
            },
        ],
        theme: Default::default(),
    }
}

#[allow(clippy::too_many_arguments)]
fn project(
    id: i64,
    title: &str,
    description: &str,
    status: ProjectStatus,
    created: &str,
    color: &str,
    notes: Vec<i64>,
    todos: Vec<i64>,
) -> Project {
    Project {
        id,
        title: title.into(),
        description: description.into(),
        status,
        date: date(created),
        color: color.into(),
        notes,
        todos,
    }
}

fn todo(id: i64, title: &str, completed: bool, priority: Priority, due: &str) -> Todo {
    Todo {
        id,
        title: title.into(),
        completed,
        priority,
        due_date: Some(date(due)),
        project_id: Some(1),
    }
}

fn date(value: &str) -> DateTime<Utc> {
    parse_timestamp(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape() {
        let sample = sample_snapshot();
        let counts = sample.counts();
        assert_eq!(counts.projects, 3);
        assert_eq!(counts.todos, 5);
        assert_eq!(counts.notes, 2);
        assert_eq!(counts.reminders, 2);
        assert_eq!(counts.open_todos, 4);
    }

    #[test]
    fn dates_are_parsed() {
        let sample = sample_snapshot();
        assert!(sample.projects.iter().all(|p| p.date.timestamp() > 0));
        assert!(sample.reminders.iter().all(|r| r.scheduled_at().is_some()));
    }

    #[test]
    fn later_projects_reference_missing_records() {
        let sample = sample_snapshot();
        assert_eq!(sample.project_todos(1).len(), 5);
        assert!(sample.project_todos(2).is_empty());
        assert!(!sample.dangling_references().is_empty());
    }
}
