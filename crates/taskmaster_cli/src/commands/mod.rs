//! CLI command implementations.

pub mod maintenance;
pub mod stats;
pub mod transfer;

use std::path::Path;
use std::sync::Arc;
use taskmaster_core::{EntityStore, StoreConfig};
use tracing::debug;

/// Opens the store in a data directory, creating the directory if needed.
///
/// Writes are deferred; mutating commands flush before they return so a
/// failed write reaches the user as an error.
pub fn open_store(data_dir: &Path) -> Result<Arc<EntityStore>, Box<dyn std::error::Error>> {
    debug!(path = %data_dir.display(), "opening data directory");
    let config = StoreConfig::new().persist_on_change(false);
    let store = EntityStore::open_dir(data_dir, config)?;
    Ok(Arc::new(store))
}
