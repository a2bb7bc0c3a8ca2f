//! Catalog sources
//!
//! The remote side of the cache: anything that can fetch the product listing
//! and a single product.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::catalog::{Product, ProductPage};
use crate::config::Config;

/// A remote catalog the cache loads from.
///
/// Errors are passed through to callers untouched; the cache does not
/// inspect them.
#[async_trait]
pub trait CatalogSource: Send + Sync + std::fmt::Debug {
    /// Fetches the product listing.
    async fn fetch_products(&self) -> anyhow::Result<ProductPage>;

    /// Fetches one product with its reviews.
    async fn fetch_product(&self, id: u32) -> anyhow::Result<Product>;
}

// == HTTP Catalog Source ==
/// Catalog source backed by a REST service (`GET products`, `GET products/{id}`).
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCatalogSource {
    /// Creates a source for the service rooted at `base_url`.
    ///
    /// A missing trailing slash is added so relative paths resolve below it.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> anyhow::Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).with_context(|| format!("invalid catalog url {base}"))?;
        Ok(Self { client, base_url })
    }

    /// Builds a source whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Self::with_client(base_url, client)
    }

    /// Builds the source named by `config`. Requests share the cache's load
    /// timeout when one is set.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.cache.load_timeout {
            Some(timeout) => Self::with_timeout(&config.catalog_base_url, timeout),
            None => Self::new(&config.catalog_base_url),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid catalog path {path}"))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "requesting catalog");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("catalog rejected {url}"))?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("malformed response from {url}"))
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_products(&self) -> anyhow::Result<ProductPage> {
        self.get_json("products").await
    }

    async fn fetch_product(&self, id: u32) -> anyhow::Result<Product> {
        self.get_json(&format!("products/{id}")).await
    }
}
