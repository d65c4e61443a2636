//! Identifier allocation.

use crate::error::{CoreError, CoreResult};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Largest id a record may carry.
///
/// Transfer documents are read by JavaScript clients, which lose precision
/// on integers above 2^53 - 1.
pub const MAX_ID: i64 = 9_007_199_254_740_991;

/// Whether `id` is a usable record id: positive and at most [`MAX_ID`].
#[must_use]
pub fn is_valid_id(id: i64) -> bool {
    (1..=MAX_ID).contains(&id)
}

/// Allocates record identifiers.
///
/// Ids are wall-clock milliseconds, bumped past the last id handed out or
/// observed, so they stay compatible with existing millisecond-based ids and
/// never collide even when several are allocated within one millisecond.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: AtomicI64,
}

impl IdAllocator {
    /// Creates an allocator that has seen no ids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator that will only hand out ids above `floor`.
    pub fn starting_after(floor: i64) -> Self {
        Self {
            last: AtomicI64::new(floor),
        }
    }

    /// Returns a fresh id, strictly greater than every id seen so far.
    ///
    /// # Errors
    ///
    /// Returns `IdSpaceExhausted` once the next id would exceed [`MAX_ID`].
    /// The allocator does not advance, so it never repeats an id.
    pub fn next(&self) -> CoreResult<i64> {
        let now = now_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last.saturating_add(1));
            if candidate > MAX_ID {
                return Err(CoreError::IdSpaceExhausted { last });
            }
            match self.last.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Ok(candidate),
                Err(actual) => last = actual,
            }
        }
    }

    /// Records an id that exists elsewhere so it is never handed out again.
    pub fn observe(&self, id: i64) {
        self.last.fetch_max(id, Ordering::AcqRel);
    }

    /// The largest id handed out or observed.
    pub fn last(&self) -> i64 {
        self.last.load(Ordering::Acquire)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
