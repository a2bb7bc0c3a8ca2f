//! Cached Accessor Module
//!
//! The cache-aside entry point: serve fresh entries from memory, otherwise
//! hand the key to the load coordinator.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheStats, CacheStore, Clock, LoadCoordinator, SystemClock};
use crate::config::CacheConfig;
use crate::error::LoadResult;

// == Cached Accessor ==
/// Read-through cache for values produced by asynchronous loaders.
///
/// Cloning is cheap; clones share the same store, registry and counters.
///
/// # Example
/// ```ignore
/// let cache = CachedAccessor::new(&CacheConfig::default());
/// let products = cache
///     .get_or_load("products", move || async move { source.fetch_products().await })
///     .await?;
/// ```
#[derive(Debug)]
pub struct CachedAccessor<V> {
    store: Arc<CacheStore<V>>,
    coordinator: LoadCoordinator<V>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    stats: Arc<StatsCounters>,
}

impl<V> Clone for CachedAccessor<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            coordinator: self.coordinator.clone(),
            clock: Arc::clone(&self.clock),
            ttl: self.ttl,
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> CachedAccessor<V> {
    // == Constructors ==
    /// Creates an accessor reading the system clock.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an accessor using `clock` to stamp and age entries.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(CacheStore::new(config.capacity));
        let stats = Arc::new(StatsCounters::default());
        let coordinator = LoadCoordinator::with_stats(
            Arc::clone(&store),
            Arc::clone(&clock),
            config,
            Arc::clone(&stats),
        );

        Self {
            store,
            coordinator,
            clock,
            ttl: config.ttl,
            stats,
        }
    }

    // == Get Or Load ==
    /// Returns the value for `key`, loading it if absent or stale.
    ///
    /// A fresh entry is returned without touching the coordinator or the
    /// loader. Misses and stale entries always go through
    /// [`LoadCoordinator::fetch_once`], so concurrent callers share one load.
    pub async fn get_or_load<F, Fut>(&self, key: &str, loader: F) -> LoadResult<V>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        match self.store.get(key) {
            Some(entry) if entry.is_fresh(self.clock.now_ms(), self.ttl) => {
                self.stats.record_hit();
                debug!(key, "cache hit");
                return Ok(entry.into_value());
            }
            Some(entry) => {
                self.stats.record_stale();
                debug!(key, age_ms = entry.age_ms(self.clock.now_ms()), "cache entry stale");
            }
            None => {
                self.stats.record_miss();
                debug!(key, "cache miss");
            }
        }

        self.coordinator.fetch_once(key, loader).await
    }

    // == Invalidate ==
    /// Drops the entry for `key`, forcing the next lookup to load.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.store.invalidate(key);
        if removed {
            debug!(key, "cache entry invalidated");
        }
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(
            self.store.evictions(),
            self.store.len(),
            self.coordinator.in_flight(),
        )
    }

    /// The underlying store.
    pub fn store(&self) -> &CacheStore<V> {
        &self.store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
