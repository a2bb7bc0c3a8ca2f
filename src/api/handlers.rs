//! API Handlers
//!
//! HTTP request handlers for each catalog cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::catalog::{CatalogService, CatalogSource, Product, ProductPage};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{HealthResponse, InvalidateResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// Cloning is cheap; every clone talks to the same cache.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

impl AppState {
    /// Creates a new AppState around an existing catalog service.
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }

    /// Creates a new AppState from configuration and a catalog source.
    pub fn from_config(config: &Config, source: Arc<dyn CatalogSource>) -> Self {
        Self::new(CatalogService::new(source, &config.cache))
    }
}

/// Handler for GET /products
pub async fn products_handler(State(state): State<AppState>) -> Result<Json<ProductPage>> {
    let page = state.catalog.products().await?;
    Ok(Json(ProductPage::clone(&page)))
}

/// Handler for GET /products/:id
///
/// Rejects ids that are not non-negative integers before touching the cache.
pub async fn product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id: u32 = id
        .parse()
        .map_err(|_| ApiError::InvalidRequest(format!("Invalid product id: {}", id)))?;

    let product = state.catalog.product(id).await?;
    Ok(Json(Product::clone(&product)))
}

/// Handler for DELETE /cache/:key
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    if key.trim().is_empty() {
        return Err(ApiError::InvalidRequest("Key cannot be empty".to_string()));
    }

    if !state.catalog.invalidate(&key) {
        return Err(ApiError::NotFound(key));
    }

    info!(key = %key, "cache entry invalidated via api");
    Ok(Json(InvalidateResponse::new(key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.catalog.cache();
    Json(StatsResponse::new(
        cache.stats(),
        cache.store().capacity().get(),
        cache.ttl().as_secs(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
