//! Backup and sync-code commands.
//!
//! Every transfer goes through a [`SyncController`], so the CLI reports the
//! same messages and follows the same replace-on-success rules as any other
//! front end. There is no camera in a terminal; the controller is built
//! with a decoder that never sees a frame.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use taskmaster_core::{EntityStore, SnapshotCounts};
use taskmaster_sync::{MockFrameDecoder, SyncConfig, SyncController, SyncError, SyncResult};
use tracing::info;

/// Builds a controller over the store.
pub fn controller(store: &Arc<EntityStore>, config: SyncConfig) -> SyncController {
    SyncController::new(Arc::clone(store), Arc::new(MockFrameDecoder::new()), config)
}

/// Writes a backup file into `out`.
pub fn export(
    store: &Arc<EntityStore>,
    out: &Path,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let sync = controller(store, SyncConfig::new(out).with_pretty_export(!compact));
    let path = report(sync.export())?.ok_or("sync busy")?;

    let counts = store.counts();
    println!("✓ Backup written");
    println!("  Path: {}", path.display());
    print_counts(&counts);
    Ok(())
}

/// Replaces every collection with a backup file's contents.
pub fn import_file(store: &Arc<EntityStore>, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %file.display(), "importing backup");
    let sync = controller(store, SyncConfig::default());
    let counts = report(sync.import_file_path(file))?.ok_or("sync busy")?;
    store.flush()?;

    println!("✓ Data imported successfully!");
    print_counts(&counts);
    Ok(())
}

/// Prints the sync code for the current data.
pub fn generate_code(store: &Arc<EntityStore>) -> Result<(), Box<dyn std::error::Error>> {
    let sync = controller(store, SyncConfig::default());
    let code = report(sync.generate_code())?.ok_or("sync busy")?;
    println!("{code}");
    Ok(())
}

/// Replaces every collection with a sync code's contents.
pub fn import_code(store: &Arc<EntityStore>, code: &str) -> Result<(), Box<dyn std::error::Error>> {
    let sync = controller(store, SyncConfig::default());
    let counts = report(sync.import_code(code))?.ok_or("sync busy")?;
    store.flush()?;

    println!("✓ Data synced successfully!");
    print_counts(&counts);
    Ok(())
}

/// Resolves a code argument; `-` reads the code from stdin.
pub fn read_code_arg(arg: &str) -> std::io::Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut code = String::new();
    std::io::stdin().read_to_string(&mut code)?;
    Ok(code)
}

/// Prints the user-facing message for a failed transfer before passing the
/// error on.
fn report<T>(result: SyncResult<T>) -> Result<T, SyncError> {
    result.inspect_err(|err| eprintln!("✗ {}", err.user_message()))
}

fn print_counts(counts: &SnapshotCounts) {
    println!("  Notes:     {}", counts.notes);
    println!("  Todos:     {}", counts.todos);
    println!("  Projects:  {}", counts.projects);
    println!("  Reminders: {}", counts.reminders);
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmaster_core::Theme;
    use tempfile::tempdir;

    fn sample_store() -> Arc<EntityStore> {
        let store = Arc::new(EntityStore::in_memory());
        store.load_sample_data();
        store
    }

    #[test]
    fn export_then_import_file() {
        let dir = tempdir().unwrap();
        let source = sample_store();
        export(&source, dir.path(), false).unwrap();

        let file = std::fs::read_dir(dir.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        let target = Arc::new(EntityStore::in_memory());
        target.set_theme(Theme::Dark);
        import_file(&target, &file).unwrap();

        assert_eq!(target.counts(), source.counts());
        assert_eq!(target.theme(), Theme::Dark);
    }

    #[test]
    fn bad_code_leaves_store_alone() {
        let store = sample_store();
        let before = store.snapshot();
        let err = import_code(&store, "definitely not base64!").unwrap_err();
        assert!(err.downcast_ref::<SyncError>().is_some());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn literal_code_argument() {
        assert_eq!(read_code_arg("abc").unwrap(), "abc");
    }
}
