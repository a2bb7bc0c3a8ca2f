//! Cache Entry Module
//!
//! Defines the immutable record stored for each cached key.

use std::time::Duration;

// == Cache Entry ==
/// A loaded value paired with the instant it was produced.
///
/// Entries are never mutated; a refresh replaces the whole entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    value: V,
    /// Creation timestamp (Unix milliseconds)
    created_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped with `created_at` (Unix milliseconds).
    pub fn new(value: V, created_at: u64) -> Self {
        Self { value, created_at }
    }

    /// The stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the entry, returning the stored value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Creation timestamp in Unix milliseconds.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    // == Age ==
    /// Returns how old the entry is at `now_ms`.
    ///
    /// An entry stamped in the future (clock moved backwards) has age zero.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at)
    }

    // == Is Fresh ==
    /// Checks whether the entry is still usable at `now_ms`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is stale.
    pub fn is_fresh(&self, now_ms: u64, ttl: Duration) -> bool {
        u128::from(self.age_ms(now_ms)) < ttl.as_millis()
    }
}
