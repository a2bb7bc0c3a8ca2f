//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

/// Default number of resident cache entries.
pub const DEFAULT_CAPACITY: usize = 100;

/// Default entry time-to-live in seconds (one hour).
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Default remote catalog endpoint.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://dummyjson.com/";

/// Cache policy parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of resident entries
    pub capacity: NonZeroUsize,
    /// Age at which an entry is considered stale
    pub ttl: Duration,
    /// Upper bound on a single loader call, if any
    pub load_timeout: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            load_timeout: None,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache policy
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the remote catalog service
    pub catalog_base_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries, at least 1 (default: 100)
    /// - `CACHE_TTL_SECS` - Entry TTL in seconds (default: 3600)
    /// - `LOAD_TIMEOUT_SECS` - Loader timeout in seconds (default: none)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CATALOG_BASE_URL` - Remote catalog base URL (default: https://dummyjson.com/)
    ///
    /// Missing or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache: CacheConfig {
                capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.cache.capacity),
                ttl: parse_var("CACHE_TTL_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.cache.ttl),
                load_timeout: parse_var::<u64>("LOAD_TIMEOUT_SECS")
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
            },
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            catalog_base_url: env::var("CATALOG_BASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.catalog_base_url),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            server_port: 3000,
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache.capacity.get(), 100);
        assert_eq!(config.cache.ttl, Duration::from_secs(3600));
        assert_eq!(config.cache.load_timeout, None);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.catalog_base_url, "https://dummyjson.com/");
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests.
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_TTL_SECS");
        env::remove_var("LOAD_TIMEOUT_SECS");
        env::remove_var("SERVER_PORT");
        env::remove_var("CATALOG_BASE_URL");

        let config = Config::from_env();
        assert_eq!(config.cache, CacheConfig::default());
        assert_eq!(config.server_port, 3000);

        env::set_var("CACHE_CAPACITY", "0");
        env::set_var("CACHE_TTL_SECS", "60");
        env::set_var("LOAD_TIMEOUT_SECS", "5");
        env::set_var("SERVER_PORT", "not-a-port");

        let config = Config::from_env();
        assert_eq!(config.cache.capacity.get(), 100, "zero capacity is rejected");
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.cache.load_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.server_port, 3000);

        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_TTL_SECS");
        env::remove_var("LOAD_TIMEOUT_SECS");
        env::remove_var("SERVER_PORT");
    }
}
