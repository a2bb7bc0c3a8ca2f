//! Catalog Service
//!
//! Routes the product-list and product-detail flows through one shared
//! cache, building collision-free keys for each resource.

use std::sync::Arc;

use anyhow::anyhow;

use crate::cache::{CacheStats, CachedAccessor};
use crate::catalog::{CatalogSource, Product, ProductPage};
use crate::config::CacheConfig;
use crate::error::{LoadError, LoadResult};

/// Cache key of the product listing.
pub const PRODUCTS_KEY: &str = "products";

/// Cache key of a single product.
pub fn product_key(id: u32) -> String {
    format!("product:{id}")
}

// == Catalog Value ==
/// Any value the catalog caches. One store holds both kinds so that the
/// capacity bound covers the whole catalog.
#[derive(Debug, Clone)]
pub enum CatalogValue {
    Products(Arc<ProductPage>),
    Product(Arc<Product>),
}

impl CatalogValue {
    fn kind(&self) -> &'static str {
        match self {
            CatalogValue::Products(_) => "product listing",
            CatalogValue::Product(_) => "product",
        }
    }

    fn into_products(self, key: &str) -> LoadResult<Arc<ProductPage>> {
        match self {
            CatalogValue::Products(page) => Ok(page),
            other => Err(mismatch(key, other.kind())),
        }
    }

    fn into_product(self, key: &str) -> LoadResult<Arc<Product>> {
        match self {
            CatalogValue::Product(product) => Ok(product),
            other => Err(mismatch(key, other.kind())),
        }
    }
}

fn mismatch(key: &str, found: &str) -> LoadError {
    LoadError::failed(anyhow!("cache key {key} holds a {found}"))
}

// == Catalog Service ==
/// Cached access to the remote catalog.
#[derive(Debug, Clone)]
pub struct CatalogService {
    cache: CachedAccessor<CatalogValue>,
    source: Arc<dyn CatalogSource>,
}

impl CatalogService {
    /// Creates a service with its own cache configured by `config`.
    pub fn new(source: Arc<dyn CatalogSource>, config: &CacheConfig) -> Self {
        Self::with_cache(source, CachedAccessor::new(config))
    }

    /// Creates a service on top of an existing cache.
    pub fn with_cache(source: Arc<dyn CatalogSource>, cache: CachedAccessor<CatalogValue>) -> Self {
        Self { cache, source }
    }

    /// Returns the product listing, loading it if absent or stale.
    pub async fn products(&self) -> LoadResult<Arc<ProductPage>> {
        let source = Arc::clone(&self.source);
        self.cache
            .get_or_load(PRODUCTS_KEY, move || async move {
                let page = source.fetch_products().await?;
                Ok::<_, anyhow::Error>(CatalogValue::Products(Arc::new(page)))
            })
            .await?
            .into_products(PRODUCTS_KEY)
    }

    /// Returns product `id` with its reviews, loading it if absent or stale.
    pub async fn product(&self, id: u32) -> LoadResult<Arc<Product>> {
        let key = product_key(id);
        let source = Arc::clone(&self.source);
        self.cache
            .get_or_load(&key, move || async move {
                let product = source.fetch_product(id).await?;
                Ok::<_, anyhow::Error>(CatalogValue::Product(Arc::new(product)))
            })
            .await?
            .into_product(&key)
    }

    /// Drops a cached entry by raw key. Returns whether one was present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.cache.invalidate(key)
    }

    pub fn invalidate_products(&self) -> bool {
        self.cache.invalidate(PRODUCTS_KEY)
    }

    pub fn invalidate_product(&self, id: u32) -> bool {
        self.cache.invalidate(&product_key(id))
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &CachedAccessor<CatalogValue> {
        &self.cache
    }
}
