//! API Module
//!
//! HTTP handlers and routing for the catalog cache.
//!
//! # Endpoints
//! - `GET /products` - Product listing
//! - `GET /products/:id` - Single product with reviews
//! - `DELETE /cache/:key` - Invalidate a cached entry
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
