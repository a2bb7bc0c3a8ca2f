//! API Routes
//!
//! Configures the Axum router with all catalog cache endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, invalidate_handler, product_handler, products_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /products` - Product listing
/// - `GET /products/:id` - Single product with reviews
/// - `DELETE /cache/:key` - Invalidate a cached entry
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/products", get(products_handler))
        .route("/products/:id", get(product_handler))
        .route("/cache/:key", delete(invalidate_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::catalog::{CatalogService, CatalogSource, Product, ProductPage};
    use crate::config::CacheConfig;

    #[derive(Debug)]
    struct UnavailableCatalog;

    #[async_trait]
    impl CatalogSource for UnavailableCatalog {
        async fn fetch_products(&self) -> anyhow::Result<ProductPage> {
            anyhow::bail!("HTTP 503")
        }

        async fn fetch_product(&self, _id: u32) -> anyhow::Result<Product> {
            anyhow::bail!("HTTP 503")
        }
    }

    fn create_test_app() -> Router {
        let catalog = CatalogService::new(Arc::new(UnavailableCatalog), &CacheConfig::default());
        create_router(AppState::new(catalog))
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of("GET", "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(status_of("GET", "/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        assert_eq!(status_of("GET", "/products").await, StatusCode::BAD_GATEWAY);
        assert_eq!(status_of("GET", "/products/1").await, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_invalidate_missing_key() {
        assert_eq!(status_of("DELETE", "/cache/products").await, StatusCode::NOT_FOUND);
    }
}
