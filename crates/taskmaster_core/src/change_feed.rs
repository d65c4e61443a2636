//! Change feed for observing store updates.
//!
//! Every successful mutation or replacement of the [`EntityStore`]
//! emits one [`StoreEvent`] after the new state is visible and persisted.
//! Views subscribe to re-render; tests use it to count replacements.
//!
//! ```
//! use taskmaster_core::{ChangeKind, EntityStore, Priority, Todo};
//!
//! let store = EntityStore::in_memory();
//! let events = store.subscribe();
//! store.add(Todo::new("water plants", Priority::Medium)).unwrap();
//!
//! let event = events.try_recv().unwrap();
//! assert_eq!(event.kind, ChangeKind::Mutated);
//! ```
//!
//! [`EntityStore`]: crate::EntityStore

use crate::model::SnapshotField;
use parking_lot::RwLock;
use std::sync::mpsc::{self, Receiver, Sender};

/// What kind of update produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// One or more fields were edited in place.
    Mutated,
    /// The collections were swapped wholesale (import, sample data).
    Replaced,
}

/// A single store update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    /// Monotonic sequence number, starting at 1.
    pub sequence: u64,
    /// Kind of update.
    pub kind: ChangeKind,
    /// Fields whose content changed.
    pub fields: Vec<SnapshotField>,
}

impl StoreEvent {
    /// Returns true if the event touched `field`.
    #[must_use]
    pub fn touches(&self, field: SnapshotField) -> bool {
        self.fields.contains(&field)
    }
}

/// Distributes store events to subscribers.
///
/// The feed preserves emission order, supports multiple subscribers and
/// drops subscribers whose receiver has gone away.
pub struct ChangeFeed {
    subscribers: RwLock<Vec<Sender<StoreEvent>>>,
    history: RwLock<Vec<StoreEvent>>,
    sequence: RwLock<u64>,
    max_history: usize,
}

impl ChangeFeed {
    /// Creates a feed with the default history limit.
    pub fn new() -> Self {
        Self::with_max_history(1024)
    }

    /// Creates a feed keeping at most `max_history` events for polling.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            history: RwLock::new(Vec::new()),
            sequence: RwLock::new(0),
            max_history,
        }
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Assigns the next sequence number and delivers the event.
    pub fn emit(&self, kind: ChangeKind, fields: Vec<SnapshotField>) -> StoreEvent {
        let event = {
            let mut sequence = self.sequence.write();
            *sequence += 1;
            StoreEvent {
                sequence: *sequence,
                kind,
                fields,
            }
        };

        {
            let mut history = self.history.write();
            history.push(event.clone());
            if history.len() > self.max_history {
                let excess = history.len() - self.max_history;
                history.drain(0..excess);
            }
        }

        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        event
    }

    /// Returns retained events with sequence greater than `cursor`, up to `limit`.
    pub fn poll(&self, cursor: u64, limit: usize) -> Vec<StoreEvent> {
        self.history
            .read()
            .iter()
            .filter(|e| e.sequence > cursor)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Sequence number of the last emitted event, or 0.
    pub fn latest_sequence(&self) -> u64 {
        *self.sequence.read()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_in_order() {
        let feed = ChangeFeed::new();
        let rx = feed.subscribe();

        feed.emit(ChangeKind::Mutated, vec![SnapshotField::Todos]);
        feed.emit(ChangeKind::Replaced, SnapshotField::COLLECTIONS.to_vec());

        let first = rx.recv().unwrap();
        let second = rx.recv().unwrap();
        assert_eq!(first.sequence, 1);
        assert!(first.touches(SnapshotField::Todos));
        assert_eq!(second.sequence, 2);
        assert_eq!(second.kind, ChangeKind::Replaced);
        assert!(!second.touches(SnapshotField::Theme));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let feed = ChangeFeed::new();
        let rx = feed.subscribe();
        let _kept = feed.subscribe();
        drop(rx);

        feed.emit(ChangeKind::Mutated, vec![SnapshotField::Theme]);
        assert_eq!(feed.subscriber_count(), 1);
    }

    #[test]
    fn history_is_bounded() {
        let feed = ChangeFeed::with_max_history(3);
        for _ in 0..5 {
            feed.emit(ChangeKind::Mutated, vec![SnapshotField::Notes]);
        }
        let events = feed.poll(0, 10);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].sequence, 3);
        assert_eq!(feed.latest_sequence(), 5);
        assert_eq!(feed.poll(4, 10).len(), 1);
    }
}
