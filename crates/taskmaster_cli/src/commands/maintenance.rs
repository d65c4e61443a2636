//! Sample data, theme and reference cleanup.

use crate::ThemeMode;
use taskmaster_core::{EntityStore, Theme};

/// Replaces every collection with the demo data. The theme is kept.
pub fn load_sample(store: &EntityStore) -> Result<(), Box<dyn std::error::Error>> {
    store.load_sample_data();
    store.flush()?;
    let counts = store.counts();
    println!(
        "✓ Sample data loaded: {} projects, {} todos, {} notes, {} reminders",
        counts.projects, counts.todos, counts.notes, counts.reminders
    );
    Ok(())
}

/// Applies a theme argument and returns the resulting theme.
pub fn apply_theme(store: &EntityStore, mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Toggle => store.toggle_theme(),
        ThemeMode::Light => {
            store.set_theme(Theme::Light);
            Theme::Light
        }
        ThemeMode::Dark => {
            store.set_theme(Theme::Dark);
            Theme::Dark
        }
    }
}

/// Runs the theme command.
pub fn theme(store: &EntityStore, mode: ThemeMode) -> Result<(), Box<dyn std::error::Error>> {
    let theme = apply_theme(store, mode);
    store.flush()?;
    println!("Theme: {theme}");
    Ok(())
}

/// Runs the prune command.
pub fn prune(store: &EntityStore, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dangling = if dry_run {
        store.dangling_references()
    } else {
        let removed = store.prune_dangling_references();
        store.flush()?;
        removed
    };

    if dangling.is_empty() {
        println!("No dangling project references");
        return Ok(());
    }

    let verb = if dry_run { "Would remove" } else { "Removed" };
    println!("{verb} {} dangling reference(s):", dangling.len());
    for reference in &dangling {
        println!(
            "  project {} -> {:?} {}",
            reference.project_id, reference.kind, reference.id
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_modes() {
        let store = EntityStore::in_memory();
        assert_eq!(apply_theme(&store, ThemeMode::Toggle), Theme::Dark);
        assert_eq!(apply_theme(&store, ThemeMode::Dark), Theme::Dark);
        assert_eq!(apply_theme(&store, ThemeMode::Toggle), Theme::Light);
        assert_eq!(apply_theme(&store, ThemeMode::Light), Theme::Light);
    }

    #[test]
    fn dry_run_prune_keeps_references() {
        let store = EntityStore::in_memory();
        store.load_sample_data();
        let before = store.dangling_references().len();
        prune(&store, true).unwrap();
        assert_eq!(store.dangling_references().len(), before);
        prune(&store, false).unwrap();
        assert!(store.dangling_references().is_empty());
    }
}
