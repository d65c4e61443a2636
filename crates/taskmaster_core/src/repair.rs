//! Id repair for collections loaded from storage or written by callers.
//!
//! A collection must never hold two records with the same id, and every id
//! must lie in `1..=MAX_ID`, or the snapshot could not be exported. Stored
//! data from older clients can break both rules, so the store repairs ids
//! whenever it hydrates or writes a collection.

use crate::id::{is_valid_id, IdAllocator, MAX_ID};
use crate::model::{Entity, Note, Project, Reminder, Snapshot, SnapshotField, Todo};
use std::collections::HashSet;
use tracing::warn;

/// Reassigns clashing or out-of-range ids in the given collections.
///
/// The first record holding a valid id keeps it; later records get fresh
/// ids from `ids`. Project references keep pointing at the record that kept
/// the id. Returns the collections that changed.
pub(crate) fn repair_ids(
    state: &mut Snapshot,
    fields: &[SnapshotField],
    ids: &IdAllocator,
) -> Vec<SnapshotField> {
    fields
        .iter()
        .copied()
        .filter(|field| match field {
            SnapshotField::Notes => repair_collection::<Note>(state, ids),
            SnapshotField::Todos => repair_collection::<Todo>(state, ids),
            SnapshotField::Projects => repair_collection::<Project>(state, ids),
            SnapshotField::Reminders => repair_collection::<Reminder>(state, ids),
            SnapshotField::Theme => false,
        })
        .collect()
}

fn repair_collection<T: Entity>(state: &mut Snapshot, ids: &IdAllocator) -> bool {
    let items = T::collection_mut(state);
    let mut seen = HashSet::with_capacity(items.len());
    let clashing: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !is_valid_id(item.id()) || !seen.insert(item.id()))
        .map(|(index, _)| index)
        .collect();

    for &index in &clashing {
        let fresh = ids.next().unwrap_or_else(|_| lowest_free(&seen));
        seen.insert(fresh);
        let item = &mut items[index];
        warn!(kind = T::KIND, old = item.id(), new = fresh, "reassigned clashing id");
        item.set_id(fresh);
    }
    !clashing.is_empty()
}

fn lowest_free(seen: &HashSet<i64>) -> i64 {
    (1..=MAX_ID).find(|id| !seen.contains(id)).unwrap_or(MAX_ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn todo(id: i64) -> Todo {
        let mut todo = Todo::new("t", Priority::Low);
        todo.id = id;
        todo
    }

    #[test]
    fn duplicates_get_fresh_ids() {
        let mut state = Snapshot {
            todos: vec![todo(1_710_000_000_000), todo(1_710_000_000_000), todo(3)],
            ..Snapshot::default()
        };
        let ids = IdAllocator::starting_after(state.max_id());

        let changed = repair_ids(&mut state, &SnapshotField::ALL, &ids);
        assert_eq!(changed, vec![SnapshotField::Todos]);
        assert_eq!(state.todos[0].id, 1_710_000_000_000);
        assert!(state.todos[1].id > 1_710_000_000_000);
        assert_eq!(state.todos[2].id, 3);
    }

    #[test]
    fn out_of_range_ids_are_replaced() {
        let mut state = Snapshot {
            todos: vec![todo(0), todo(-4), todo(i64::MAX), todo(8)],
            ..Snapshot::default()
        };
        let ids = IdAllocator::starting_after(state.max_id());

        repair_ids(&mut state, &SnapshotField::COLLECTIONS, &ids);
        let kept: Vec<i64> = state.todos.iter().map(|t| t.id).collect();
        assert_eq!(kept[3], 8);
        assert!(kept.iter().all(|id| is_valid_id(*id)));
        assert_eq!(kept.iter().collect::<HashSet<_>>().len(), 4);
    }

    #[test]
    fn exhausted_allocator_falls_back_to_free_ids() {
        let mut state = Snapshot {
            todos: vec![todo(1), todo(MAX_ID), todo(MAX_ID)],
            ..Snapshot::default()
        };
        let ids = IdAllocator::starting_after(MAX_ID);

        assert_eq!(
            repair_ids(&mut state, &[SnapshotField::Todos], &ids),
            vec![SnapshotField::Todos]
        );
        assert_eq!(state.todos[2].id, 2);
    }

    #[test]
    fn untouched_collections_are_not_reported() {
        let mut state = Snapshot {
            todos: vec![todo(1), todo(1)],
            ..Snapshot::default()
        };
        let ids = IdAllocator::starting_after(state.max_id());

        assert!(repair_ids(&mut state, &[SnapshotField::Notes], &ids).is_empty());
        assert_eq!(state.todos[1].id, 1);
    }
}
