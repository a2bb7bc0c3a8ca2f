//! Response models for the catalog cache API
//!
//! Catalog documents are served as-is from `crate::catalog`; this module
//! holds the bodies the API adds around them.

pub mod responses;

// Re-export commonly used types
pub use responses::{ErrorResponse, HealthResponse, InvalidateResponse, StatsResponse};
