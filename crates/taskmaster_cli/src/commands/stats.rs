//! Stats command implementation.

use serde::Serialize;
use taskmaster_core::{EntityStore, SnapshotCounts, Theme};

/// Store statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    /// Collection sizes.
    #[serde(flatten)]
    pub counts: SnapshotCounts,
    /// Display theme.
    pub theme: Theme,
    /// Project references that point at missing records.
    pub dangling_references: usize,
}

/// Collects statistics from the store.
pub fn collect(store: &EntityStore) -> StatsResult {
    StatsResult {
        counts: store.counts(),
        theme: store.theme(),
        dangling_references: store.dangling_references().len(),
    }
}

/// Runs the stats command.
pub fn run(store: &EntityStore, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = collect(store);
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text_output(&result),
    }
    Ok(())
}

fn print_text_output(result: &StatsResult) {
    let counts = &result.counts;
    println!("Taskmaster Data");
    println!("===============");
    println!();
    println!("Collections:");
    println!("  Notes:     {}", counts.notes);
    println!("  Todos:     {} ({} open)", counts.todos, counts.open_todos);
    println!("  Projects:  {}", counts.projects);
    println!(
        "  Reminders: {} ({} open)",
        counts.reminders, counts.open_reminders
    );
    println!();
    println!("Theme: {}", result.theme);
    if result.dangling_references > 0 {
        println!();
        println!(
            "{} project reference(s) point at missing records; run `taskmaster prune`",
            result.dangling_references
        );
    }
}
