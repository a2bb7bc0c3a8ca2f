//! Catalog Module
//!
//! Product catalog models, the remote sources the cache loads from, and the
//! cached service used by the product-list and product-detail flows.

mod models;
mod service;
mod source;

pub use models::{Product, ProductPage, Review};
pub use service::{product_key, CatalogService, CatalogValue, PRODUCTS_KEY};
pub use source::{CatalogSource, HttpCatalogSource};
