//! List Statistics Module
//!
//! Tracks bounded list activity including pushes, evictions, and removals.

use serde::Serialize;

// == List Stats ==
/// Bounded list activity counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListStats {
    /// Number of items pushed at either end
    pub pushes: u64,
    /// Number of items dropped at the opposite end because the list was full
    pub evictions: u64,
    /// Number of items handed back to callers by a removal operation
    pub removals: u64,
    /// Current number of items in the list
    pub len: usize,
    /// Maximum number of items the list holds
    pub capacity: usize,
}

impl ListStats {
    // == Constructor ==
    /// Creates a new ListStats with all counters at zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    // == Fill Ratio ==
    /// Returns len / capacity, or 0.0 for a zero capacity.
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.len as f64 / self.capacity as f64
        }
    }

    pub(crate) fn record_push(&mut self) {
        self.pushes += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_removals(&mut self, count: usize) {
        self.removals += count as u64;
    }
}
