//! Cache Store Module
//!
//! Bounded key/value storage combining a HashMap with LRU recency tracking.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, RecencyIndex};

// == Cache Store ==
/// Thread-safe, capacity-bounded store of [`CacheEntry`] values.
///
/// The store never judges freshness; that is left to the caller. Every
/// operation runs under a single lock and never waits on anything else, so
/// the resident entry count is at most `capacity` whenever the lock is free.
#[derive(Debug)]
pub struct CacheStore<V> {
    state: Mutex<StoreState<V>>,
    capacity: NonZeroUsize,
}

#[derive(Debug)]
struct StoreState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    recency: RecencyIndex,
    evictions: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            state: Mutex::new(StoreState {
                entries: HashMap::with_capacity(capacity.get()),
                recency: RecencyIndex::new(),
                evictions: 0,
            }),
            capacity,
        }
    }

    // == Get ==
    /// Returns a copy of the entry for `key` and marks it recently used.
    pub fn get(&self, key: &str) -> Option<CacheEntry<V>> {
        let mut state = self.state.lock();
        let entry = state.entries.get(key).cloned()?;
        state.recency.touch(key);
        Some(entry)
    }

    // == Put ==
    /// Inserts or replaces the entry for `key` and marks it most recently used.
    ///
    /// If the insert pushes the store past capacity, the least recently used
    /// entry is evicted and its key returned. The entry just written is never
    /// the one evicted.
    pub fn put(&self, key: String, entry: CacheEntry<V>) -> Option<String> {
        let mut state = self.state.lock();
        state.recency.touch(&key);
        state.entries.insert(key, entry);

        if state.entries.len() <= self.capacity.get() {
            return None;
        }

        let evicted = state.recency.pop_lru()?;
        state.entries.remove(&evicted);
        state.evictions += 1;
        debug!(key = %evicted, "evicted least recently used entry");
        Some(evicted)
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Returns whether one was present.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut state = self.state.lock();
        if state.entries.remove(key).is_some() {
            state.recency.remove(key);
            true
        } else {
            false
        }
    }

    /// Keys ordered from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.state
            .lock()
            .recency
            .iter_mru()
            .map(str::to_owned)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Number of entries evicted for capacity since creation.
    pub fn evictions(&self) -> u64 {
        self.state.lock().evictions
    }
}
