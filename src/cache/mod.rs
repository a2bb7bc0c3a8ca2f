//! Cache Module
//!
//! Cache-aside data access with TTL freshness, LRU eviction and
//! single-flight loading.

mod accessor;
mod clock;
mod coordinator;
mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use accessor::CachedAccessor;
pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::LoadCoordinator;
pub use entry::CacheEntry;
pub use lru::RecencyIndex;
pub use stats::CacheStats;
pub use store::CacheStore;
