//! Common behaviour of the four record types.

use super::snapshot::{Snapshot, SnapshotField};

/// A record that lives in one of the snapshot's collections.
///
/// The store's generic `add`/`update`/`delete`/`get` operations are written
/// against this trait, so each record type only states where it lives and
/// what makes it valid.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The collection that holds this record type.
    const FIELD: SnapshotField;

    /// Human-readable kind used in errors and logs.
    const KIND: &'static str;

    /// Returns the identifier.
    fn id(&self) -> i64;

    /// Replaces the identifier.
    fn set_id(&mut self, id: i64);

    /// Returns the owning collection.
    fn collection(snapshot: &Snapshot) -> &[Self];

    /// Returns the owning collection for mutation.
    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self>;

    /// Checks the record before it is accepted by the store.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated rule.
    fn validate(&self) -> Result<(), String>;

    /// Removes references to a deleted record from other collections.
    ///
    /// Returns `true` when another collection changed.
    fn unlink(_snapshot: &mut Snapshot, _id: i64) -> bool {
        false
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} must not be empty"))
    } else {
        Ok(())
    }
}
