//! Error types for the catalog cache
//!
//! Provides the loader failure shared by every waiter of a load, and the
//! HTTP-facing error built on top of it.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Load Error ==
/// Failure of a single load cycle.
///
/// Cloning is cheap: every caller waiting on the same cycle receives a clone
/// pointing at the same underlying cause.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    /// The loader itself returned an error
    #[error("load failed: {0:#}")]
    Failed(Arc<anyhow::Error>),

    /// The loader did not finish within the configured timeout
    #[error("load timed out after {0:?}")]
    TimedOut(Duration),

    /// The loader task ended without producing a result (e.g. it panicked)
    #[error("load aborted before completing")]
    Aborted,
}

impl LoadError {
    /// Wraps a loader error.
    pub fn failed(err: impl Into<anyhow::Error>) -> Self {
        LoadError::Failed(Arc::new(err.into()))
    }

    /// Returns true if both errors come from the same load cycle.
    pub fn same_cause(&self, other: &LoadError) -> bool {
        match (self, other) {
            (LoadError::Failed(a), LoadError::Failed(b)) => Arc::ptr_eq(a, b),
            (LoadError::TimedOut(a), LoadError::TimedOut(b)) => a == b,
            (LoadError::Aborted, LoadError::Aborted) => true,
            _ => false,
        }
    }
}

// == Api Error ==
/// Error returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Upstream catalog load failed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Key not resident in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Load(LoadError::TimedOut(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Load(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Result of a cache load.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
