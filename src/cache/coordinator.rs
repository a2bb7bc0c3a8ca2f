//! Load Coordinator Module
//!
//! Collapses concurrent loads of the same key into a single loader call.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, warn, Instrument};

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStore, Clock};
use crate::config::CacheConfig;
use crate::error::{LoadError, LoadResult};

type LoadChannel<V> = Shared<oneshot::Receiver<LoadResult<V>>>;
type InFlightMap<V> = Arc<Mutex<HashMap<String, LoadChannel<V>>>>;

// == Load Coordinator ==
/// Ensures at most one loader runs per key at any time.
///
/// Callers that ask for a key while its load is outstanding attach to the
/// pending result instead of starting their own. The loader runs on a
/// spawned task, so a caller that stops waiting does not cancel the load
/// for everyone else, and a successful result still lands in the store.
///
/// Lock order is always registry, then store.
pub struct LoadCoordinator<V> {
    store: Arc<CacheStore<V>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    load_timeout: Option<Duration>,
    in_flight: InFlightMap<V>,
    stats: Arc<StatsCounters>,
}

impl<V> Clone for LoadCoordinator<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            ttl: self.ttl,
            load_timeout: self.load_timeout,
            in_flight: Arc::clone(&self.in_flight),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<V> fmt::Debug for LoadCoordinator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadCoordinator")
            .field("ttl", &self.ttl)
            .field("load_timeout", &self.load_timeout)
            .field("in_flight", &self.in_flight.lock().len())
            .finish_non_exhaustive()
    }
}

/// Outcome of looking a key up in the registry.
enum Registration<V> {
    /// Another caller's load is outstanding
    Joined(LoadChannel<V>),
    /// A load finished between the caller's cache check and now
    Cached(V),
    /// This caller owns the new load
    Started(LoadChannel<V>, oneshot::Sender<LoadResult<V>>),
}

impl<V: Clone + Send + Sync + 'static> LoadCoordinator<V> {
    // == Constructor ==
    /// Creates a coordinator writing successful loads into `store`.
    pub fn new(store: Arc<CacheStore<V>>, clock: Arc<dyn Clock>, config: &CacheConfig) -> Self {
        Self::with_stats(store, clock, config, Arc::default())
    }

    pub(crate) fn with_stats(
        store: Arc<CacheStore<V>>,
        clock: Arc<dyn Clock>,
        config: &CacheConfig,
        stats: Arc<StatsCounters>,
    ) -> Self {
        Self {
            store,
            clock,
            ttl: config.ttl,
            load_timeout: config.load_timeout,
            in_flight: Arc::default(),
            stats,
        }
    }

    // == Fetch Once ==
    /// Loads `key`, sharing a single loader call among concurrent callers.
    ///
    /// `loader` is invoked only when no load for `key` is in flight and the
    /// store holds no fresh entry. Every caller attached to the same cycle
    /// receives the same value or the same [`LoadError`]. Failures are never
    /// stored, so the next call after a failure starts a new attempt.
    pub async fn fetch_once<F, Fut>(&self, key: &str, loader: F) -> LoadResult<V>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let registration = {
            let mut in_flight = self.in_flight.lock();
            if let Some(channel) = in_flight.get(key).cloned() {
                Registration::Joined(channel)
            } else if let Some(value) = self.fresh_value(key) {
                Registration::Cached(value)
            } else {
                let (sender, receiver) = oneshot::channel();
                let channel = receiver.shared();
                in_flight.insert(key.to_owned(), channel.clone());
                Registration::Started(channel, sender)
            }
        };

        let channel = match registration {
            Registration::Joined(channel) => {
                self.stats.record_coalesced();
                debug!(key, "joining load already in flight");
                channel
            }
            Registration::Cached(value) => return Ok(value),
            Registration::Started(channel, sender) => {
                // Armed before `loader` runs so a panic while building the
                // future still clears the registry.
                let registration =
                    RegistrationGuard::new(key.to_owned(), Arc::clone(&self.in_flight));
                self.spawn_load(registration, loader(), sender);
                channel
            }
        };

        // The sender only disappears without a result if the load task died.
        channel.await.unwrap_or(Err(LoadError::Aborted))
    }

    /// Number of loads currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    fn fresh_value(&self, key: &str) -> Option<V> {
        let entry = self.store.get(key)?;
        entry
            .is_fresh(self.clock.now_ms(), self.ttl)
            .then(|| entry.into_value())
    }

    fn spawn_load<Fut>(
        &self,
        mut registration: RegistrationGuard<V>,
        load: Fut,
        sender: oneshot::Sender<LoadResult<V>>,
    ) where
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let key = registration.key().to_owned();
        self.stats.record_load();
        info!(key = %key, "loading");

        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let in_flight = Arc::clone(&self.in_flight);
        let stats = Arc::clone(&self.stats);
        let load_timeout = self.load_timeout;
        let span = tracing::info_span!("cache_load", key = %key);

        tokio::spawn(
            async move {
                let result = match load_timeout {
                    Some(limit) => match tokio::time::timeout(limit, load).await {
                        Ok(outcome) => outcome.map_err(LoadError::failed),
                        Err(_) => Err(LoadError::TimedOut(limit)),
                    },
                    None => load.await.map_err(LoadError::failed),
                };

                {
                    let mut in_flight = in_flight.lock();
                    match &result {
                        Ok(value) => {
                            let entry = CacheEntry::new(value.clone(), clock.now_ms());
                            if let Some(evicted) = store.put(key.clone(), entry) {
                                info!(evicted = %evicted, "capacity reached, evicted entry");
                            }
                            debug!("load stored");
                        }
                        Err(err) => {
                            stats.record_load_failure();
                            warn!(error = %err, "load failed");
                        }
                    }
                    in_flight.remove(&key);
                    registration.disarm();
                }

                // Every waiter may have gone away; the store is up to date regardless.
                let _ = sender.send(result);
            }
            .instrument(span),
        );
    }
}

// == Registration Guard ==
/// Removes a key from the registry if the load ends without doing so itself,
/// e.g. because the loader panicked while building or polling its future.
struct RegistrationGuard<V> {
    key: Option<String>,
    in_flight: InFlightMap<V>,
}

impl<V> RegistrationGuard<V> {
    fn new(key: String, in_flight: InFlightMap<V>) -> Self {
        Self {
            key: Some(key),
            in_flight,
        }
    }

    fn key(&self) -> &str {
        self.key.as_deref().unwrap_or_default()
    }

    fn disarm(&mut self) {
        self.key = None;
    }
}

impl<V> Drop for RegistrationGuard<V> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.in_flight.lock().remove(&key);
        }
    }
}
