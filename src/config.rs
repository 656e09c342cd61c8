//! Configuration Module
//!
//! Handles loading store and page cache settings from environment variables.

use std::env;

use crate::store::MAX_TTL_SECS;

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";

/// Default page cache expiration in seconds
pub const DEFAULT_PAGE_TTL: u64 = 10;

/// Default HTTP request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT: u64 = 30;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection URL of the backing Redis server
    pub redis_url: String,
    /// Expiration in seconds for cached pages
    pub page_ttl: u64,
    /// Timeout in seconds for page fetches
    pub http_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379/)
    /// - `PAGE_CACHE_TTL` - Page expiration in seconds (default: 10, also used when
    ///   the value is 0 or above `MAX_TTL_SECS`)
    /// - `HTTP_TIMEOUT` - Fetch timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            page_ttl: env::var("PAGE_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl| (1..=MAX_TTL_SECS).contains(ttl))
                .unwrap_or(DEFAULT_PAGE_TTL),
            http_timeout: env::var("HTTP_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HTTP_TIMEOUT),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            page_ttl: DEFAULT_PAGE_TTL,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}
