//! Bounded in-memory history of metrics snapshots.
//!
//! [`MetricsStore`] is a mutex-guarded ring: `add` appends at the tail and
//! evicts from the head past capacity, `get_all` copies the contents out
//! under the same lock, so readers never observe a half-applied `add`.
//! Timestamps in the ring never decrease.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use super::MetricsSnapshot;

/// Default number of retained snapshots.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Fixed-capacity FIFO of the most recent snapshots.
#[derive(Debug)]
pub struct MetricsStore {
    capacity: usize,
    snapshots: Mutex<VecDeque<MetricsSnapshot>>,
}

impl MetricsStore {
    /// Creates an empty store holding at most `capacity` snapshots.
    ///
    /// A capacity of 0 is raised to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            snapshots: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Appends a snapshot, discarding the oldest ones past capacity.
    ///
    /// A snapshot stamped earlier than the current tail is moved up to the
    /// tail's timestamp. Returns the snapshot as stored.
    pub fn add(&self, snapshot: MetricsSnapshot) -> MetricsSnapshot {
        let mut snapshots = self.lock();
        let snapshot = match snapshots.back() {
            Some(last) => snapshot.not_before(last.timestamp()),
            None => snapshot,
        };
        snapshots.push_back(snapshot.clone());
        while snapshots.len() > self.capacity {
            snapshots.pop_front();
        }
        snapshot
    }

    /// Returns a copy of the history, oldest first.
    #[must_use]
    pub fn get_all(&self) -> Vec<MetricsSnapshot> {
        self.lock().iter().cloned().collect()
    }

    /// Timestamp of the newest snapshot, if any.
    #[must_use]
    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.lock().back().map(MetricsSnapshot::timestamp)
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been collected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of retained snapshots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    // A panicking writer cannot leave the deque half-updated, so a
    // poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, VecDeque<MetricsSnapshot>> {
        self.snapshots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
