//! Page Fetcher
//!
//! HTTP collaborator of the page cache.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::{Config, DEFAULT_HTTP_TIMEOUT};
use crate::error::{CacheError, Result};

// == Page Fetcher ==
/// Retrieves the body of a URL as text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`. Any non-success status is an error.
    async fn fetch(&self, url: &str) -> Result<String>;
}

// == HTTP Fetcher ==
/// [`PageFetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the default request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT))
    }

    /// Creates a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("redis-memo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Creates a fetcher using the configured timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(Duration::from_secs(config.http_timeout))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CacheError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await?;
        info!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_builds() {
        assert!(HttpFetcher::new().is_ok());
        assert!(HttpFetcher::from_config(&Config::default()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_error() {
        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(2)).unwrap();

        // Port 9 (discard) on localhost is expected to refuse connections
        let result = fetcher.fetch("http://127.0.0.1:9/").await;
        assert!(matches!(result, Err(CacheError::Fetch(_))));
    }
}
