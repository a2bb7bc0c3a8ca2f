//! Catalog Cache - cache-aside data access for a product catalog
//!
//! Answers repeated product-list and product-detail reads from memory with
//! TTL freshness and LRU eviction, and collapses concurrent loads of the
//! same key into a single remote call.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::CachedAccessor;
pub use catalog::{CatalogService, HttpCatalogSource};
pub use config::{CacheConfig, Config};
pub use error::{LoadError, LoadResult};
