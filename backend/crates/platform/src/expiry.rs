//! Expiry Queue
//!
//! A min-ordered queue of `(deadline, key)` pairs. Reapers pop the due
//! prefix in O(log n) per item instead of scanning the whole keyspace.
//!
//! The queue is advisory: it may hold keys whose entry was already removed
//! (evicted on read, superseded). Callers must re-check the authoritative map
//! before removing anything, and call [`ExpiryQueue::retain`] to compact.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use parking_lot::Mutex;
use tokio::time::Instant;

struct Deadline<K> {
    at: Instant,
    key: K,
}

// Ordered by deadline only; keys never take part in the comparison.
impl<K> PartialEq for Deadline<K> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl<K> Eq for Deadline<K> {}

impl<K> PartialOrd for Deadline<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Deadline<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at)
    }
}

/// Thread-safe min-queue of deadlines.
///
/// Every mutation takes the same internal lock, which is held only for the
/// heap operation itself and never across calls into other structures.
pub struct ExpiryQueue<K> {
    heap: Mutex<BinaryHeap<Reverse<Deadline<K>>>>,
}

impl<K> Default for ExpiryQueue<K> {
    fn default() -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::new()),
        }
    }
}

impl<K> ExpiryQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` to become due at `at`.
    pub fn schedule(&self, key: K, at: Instant) {
        self.heap.lock().push(Reverse(Deadline { at, key }));
    }

    /// Remove and return every key whose deadline is `<= now`, earliest first.
    pub fn pop_due(&self, now: Instant) -> Vec<K> {
        let mut heap = self.heap.lock();
        let mut due = Vec::new();
        while heap.peek().is_some_and(|Reverse(d)| d.at <= now) {
            if let Some(Reverse(d)) = heap.pop() {
                due.push(d.key);
            }
        }
        due
    }

    /// Drop queued `(key, deadline)` pairs for which `keep` returns false.
    /// Returns how many were dropped.
    pub fn retain(&self, mut keep: impl FnMut(&K, Instant) -> bool) -> usize {
        let mut heap = self.heap.lock();
        let before = heap.len();
        heap.retain(|Reverse(d)| keep(&d.key, d.at));
        before - heap.len()
    }

    pub fn len(&self) -> usize {
        self.heap.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.lock().is_empty()
    }

    pub fn clear(&self) {
        self.heap.lock().clear();
    }
}
