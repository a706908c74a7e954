//! Bounded List Module
//!
//! Capacity-limited double-ended list guarded by a single mutex. Pushing onto
//! a full list silently evicts the item at the opposite end, so the capacity
//! acts as a sliding window rather than a rejection policy.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::config::DEFAULT_LIST_CAPACITY;
use crate::list::chain::Chain;
use crate::list::ListStats;

/// Which end of the list an operation starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Front,
    Back,
}

impl End {
    fn opposite(self) -> Self {
        match self {
            End::Front => End::Back,
            End::Back => End::Front,
        }
    }
}

/// Chain and counters, always accessed together under the lock.
#[derive(Debug)]
struct ListState<T> {
    chain: Chain<T>,
    stats: ListStats,
}

// == Bounded List ==
/// Thread-safe, capacity-bounded double-ended list with predicate search
/// and removal.
///
/// Every operation takes one exclusive lock over the whole list for its
/// duration. Predicates are called while that lock is held, so they must
/// not call back into the same list.
///
/// Searching and removing by predicate take a caller-supplied `key` and a
/// function `predicate(key, item)`; the list never exposes node identity,
/// only items.
///
/// ```rust
/// use bounded_store::BoundedList;
///
/// let list = BoundedList::new(3);
/// list.push_back("a");
/// list.push_back("b");
/// list.push_back("c");
/// list.push_front("d"); // evicts "c"
///
/// assert_eq!(list.to_vec(), vec!["d", "a", "b"]);
/// assert_eq!(list.remove_item_from_back(&"a", |k, v| k == v), Some("a"));
/// ```
#[derive(Debug)]
pub struct BoundedList<T> {
    state: Mutex<ListState<T>>,
    capacity: usize,
}

impl<T> BoundedList<T> {
    // == Constructor ==
    /// Creates an empty list holding at most `capacity` items.
    ///
    /// A capacity of zero selects the built-in default of 1000.
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_LIST_CAPACITY
        } else {
            capacity
        };

        Self {
            state: Mutex::new(ListState {
                chain: Chain::new(),
                stats: ListStats::new(capacity),
            }),
            capacity,
        }
    }

    /// Returns the maximum number of items the list holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current number of items.
    pub fn len(&self) -> usize {
        self.lock().chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Push ==
    /// Inserts an item at the front, evicting the back item if the list
    /// was already full.
    pub fn push_front(&self, item: T) {
        self.push(End::Front, item);
    }

    /// Inserts an item at the back, evicting the front item if the list
    /// was already full.
    pub fn push_back(&self, item: T) {
        self.push(End::Back, item);
    }

    // == Remove From End ==
    /// Removes and returns the front item, or `None` if the list is empty.
    pub fn remove_front(&self) -> Option<T> {
        self.remove_end(End::Front)
    }

    /// Removes and returns the back item, or `None` if the list is empty.
    pub fn remove_back(&self) -> Option<T> {
        self.remove_end(End::Back)
    }

    // == Remove By Predicate ==
    /// Scans front to back and removes the first item for which
    /// `predicate(key, item)` holds.
    pub fn remove_item_from_front<K, F>(&self, key: &K, predicate: F) -> Option<T>
    where
        K: ?Sized,
        F: FnMut(&K, &T) -> bool,
    {
        self.remove_first_match(End::Front, key, predicate)
    }

    /// Scans back to front and removes the first item for which
    /// `predicate(key, item)` holds.
    pub fn remove_item_from_back<K, F>(&self, key: &K, predicate: F) -> Option<T>
    where
        K: ?Sized,
        F: FnMut(&K, &T) -> bool,
    {
        self.remove_first_match(End::Back, key, predicate)
    }

    /// Removes every item for which `predicate(key, item)` holds and returns
    /// them in front-to-back order.
    ///
    /// Matches are collected in a first pass and unlinked in a second, so the
    /// predicate never observes a partially modified list.
    pub fn remove_all_items<K, F>(&self, key: &K, mut predicate: F) -> Vec<T>
    where
        K: ?Sized,
        F: FnMut(&K, &T) -> bool,
    {
        let mut state = self.lock();

        let matched: Vec<usize> = scan(&state.chain, End::Front)
            .filter(|&(_, item)| predicate(key, item))
            .map(|(idx, _)| idx)
            .collect();

        let removed: Vec<T> = matched
            .into_iter()
            .filter_map(|idx| state.chain.unlink(idx))
            .collect();

        state.stats.record_removals(removed.len());
        removed
    }

    /// Drops every item in the list.
    pub fn clear(&self) {
        let mut state = self.lock();
        let len = state.chain.len();
        state.chain.clear();
        state.stats.record_removals(len);
    }

    // == Stats ==
    /// Returns a snapshot of the list counters.
    pub fn stats(&self) -> ListStats {
        let state = self.lock();
        let mut stats = state.stats.clone();
        stats.len = state.chain.len();
        stats
    }

    // == Internal Helpers ==
    /// A predicate that panicked poisons the mutex, but predicates only run
    /// before any mutation, so the state behind a poisoned lock is intact.
    fn lock(&self) -> MutexGuard<'_, ListState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, end: End, item: T) {
        let mut state = self.lock();
        match end {
            End::Front => state.chain.push_front(item),
            End::Back => state.chain.push_back(item),
        }
        state.stats.record_push();

        if state.chain.len() > self.capacity {
            let evicted = match end.opposite() {
                End::Front => state.chain.pop_front(),
                End::Back => state.chain.pop_back(),
            };
            if evicted.is_some() {
                state.stats.record_eviction();
                debug!(
                    capacity = self.capacity,
                    end = ?end.opposite(),
                    "Bounded list full, evicted one item"
                );
            }
        }
    }

    fn remove_end(&self, end: End) -> Option<T> {
        let mut state = self.lock();
        let item = match end {
            End::Front => state.chain.pop_front(),
            End::Back => state.chain.pop_back(),
        }?;
        state.stats.record_removals(1);
        Some(item)
    }

    fn remove_first_match<K, F>(&self, from: End, key: &K, mut predicate: F) -> Option<T>
    where
        K: ?Sized,
        F: FnMut(&K, &T) -> bool,
    {
        let mut state = self.lock();
        let idx = scan(&state.chain, from)
            .find(|&(_, item)| predicate(key, item))
            .map(|(idx, _)| idx)?;

        let item = state.chain.unlink(idx)?;
        state.stats.record_removals(1);
        Some(item)
    }
}

impl<T: Clone> BoundedList<T> {
    // == Search ==
    /// Scans front to back and returns clones of the matching items, in scan
    /// order. A `limit` of zero collects every match; otherwise the scan stops
    /// once `limit` matches are collected.
    pub fn search_front<K, F>(&self, key: &K, limit: usize, predicate: F) -> Vec<T>
    where
        K: ?Sized,
        F: FnMut(&K, &T) -> bool,
    {
        self.search(End::Front, key, limit, predicate)
    }

    /// Same as [`search_front`](Self::search_front), scanning back to front.
    pub fn search_back<K, F>(&self, key: &K, limit: usize, predicate: F) -> Vec<T>
    where
        K: ?Sized,
        F: FnMut(&K, &T) -> bool,
    {
        self.search(End::Back, key, limit, predicate)
    }

    // == Peek ==
    /// Returns a clone of the front item without removing it.
    pub fn peek_front(&self) -> Option<T> {
        let state = self.lock();
        state.chain.front().and_then(|idx| state.chain.get(idx)).cloned()
    }

    /// Returns a clone of the back item without removing it.
    pub fn peek_back(&self) -> Option<T> {
        let state = self.lock();
        state.chain.back().and_then(|idx| state.chain.get(idx)).cloned()
    }

    /// Returns a front-to-back snapshot of the list.
    pub fn to_vec(&self) -> Vec<T> {
        let state = self.lock();
        scan(&state.chain, End::Front)
            .map(|(_, item)| item.clone())
            .collect()
    }

    fn search<K, F>(&self, from: End, key: &K, limit: usize, mut predicate: F) -> Vec<T>
    where
        K: ?Sized,
        F: FnMut(&K, &T) -> bool,
    {
        let state = self.lock();
        let matches = scan(&state.chain, from)
            .filter(|&(_, item)| predicate(key, item))
            .map(|(_, item)| item.clone());

        if limit > 0 {
            matches.take(limit).collect()
        } else {
            matches.collect()
        }
    }
}

impl<T> Default for BoundedList<T> {
    fn default() -> Self {
        Self::new(DEFAULT_LIST_CAPACITY)
    }
}

/// Walks the chain from one end toward the other, yielding slot indices
/// alongside the items.
fn scan<'a, T>(chain: &'a Chain<T>, from: End) -> impl Iterator<Item = (usize, &'a T)> {
    let mut cursor = match from {
        End::Front => chain.front(),
        End::Back => chain.back(),
    };

    std::iter::from_fn(move || {
        let idx = cursor?;
        cursor = match from {
            End::Front => chain.next(idx),
            End::Back => chain.prev(idx),
        };
        chain.get(idx).map(|item| (idx, item))
    })
}
