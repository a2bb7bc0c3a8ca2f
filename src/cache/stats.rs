//! Cache Statistics Module
//!
//! Tracks lookup outcomes, loader activity and evictions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a fresh entry
    pub hits: u64,
    /// Lookups for a key with no resident entry
    pub misses: u64,
    /// Lookups that found an entry past its TTL
    pub stale: u64,
    /// Loader invocations started
    pub loads: u64,
    /// Loader invocations that ended in an error
    pub load_failures: u64,
    /// Callers that attached to a load already in flight
    pub coalesced: u64,
    /// Entries evicted due to capacity pressure
    pub evictions: u64,
    /// Current number of resident entries
    pub total_entries: usize,
    /// Loads currently in flight
    pub in_flight: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Returns hits / (hits + misses + stale), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.stale;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Counters ==
/// Lock-free counters shared by the accessor and the coordinator.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    stale: AtomicU64,
    loads: AtomicU64,
    load_failures: AtomicU64,
    coalesced: AtomicU64,
}

impl StatsCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale(&self) {
        self.stale.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    /// Builds a snapshot; store-owned figures are supplied by the caller.
    pub fn snapshot(&self, evictions: u64, total_entries: usize, in_flight: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            evictions,
            total_entries,
            in_flight,
        }
    }
}
