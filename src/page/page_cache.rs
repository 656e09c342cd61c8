//! Page Cache Module
//!
//! Caches fetched pages with a fixed expiration and counts every access.

use std::sync::Arc;

use tracing::debug;

use crate::config::{Config, DEFAULT_PAGE_TTL};
use crate::error::{CacheError, Result};
use crate::instrument::call_count;
use crate::page::{HttpFetcher, PageFetcher};
use crate::store::{validate_ttl, KvStore};

/// Key of the access counter for `url`.
pub fn count_key(url: &str) -> String {
    format!("count:{url}")
}

/// Key of the cached body for `url`.
pub fn cached_key(url: &str) -> String {
    format!("cached:{url}")
}

// == Page Cache ==
/// Read-through cache of page bodies over a key-value store.
///
/// Entries are never invalidated explicitly; they disappear when the store
/// expires them.
pub struct PageCache<F = HttpFetcher> {
    store: Arc<dyn KvStore>,
    fetcher: F,
    expiration: u64,
}

impl PageCache<HttpFetcher> {
    /// Creates a page cache with an HTTP fetcher and settings from `config`.
    pub fn from_config(store: Arc<dyn KvStore>, config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(config)?;
        Self::with_expiration(store, fetcher, config.page_ttl)
    }
}

impl<F: PageFetcher> PageCache<F> {
    // == Constructor ==
    /// Creates a page cache keeping pages for the default 10 seconds.
    pub fn new(store: Arc<dyn KvStore>, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            expiration: DEFAULT_PAGE_TTL,
        }
    }

    /// Creates a page cache keeping pages for `expiration` seconds.
    ///
    /// # Errors
    /// `InvalidExpiry` when `expiration` is zero or above
    /// [`MAX_TTL_SECS`](crate::store::MAX_TTL_SECS).
    pub fn with_expiration(store: Arc<dyn KvStore>, fetcher: F, expiration: u64) -> Result<Self> {
        validate_ttl("page cache", expiration)?;
        Ok(Self {
            store,
            fetcher,
            expiration,
        })
    }

    /// Seconds a fetched page stays cached.
    pub fn expiration(&self) -> u64 {
        self.expiration
    }

    // == Get Page ==
    /// Returns the body of `url`, from cache when a live entry exists.
    ///
    /// The access counter is incremented on every call, hit or miss. On a
    /// miss the page is fetched and cached for [`expiration`](Self::expiration)
    /// seconds. Fetch failures are returned without caching anything.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        let count = self.store.incr(&count_key(url)).await?;

        let key = cached_key(url);
        if let Some(cached) = self.store.get(&key).await? {
            debug!(url, count, "page cache hit");
            return String::from_utf8(cached)
                .map_err(|err| CacheError::Conversion(err.to_string()));
        }

        debug!(url, count, "page cache miss");
        let page = self.fetcher.fetch(url).await?;
        self.store
            .set_with_expiry(&key, page.clone().into_bytes(), self.expiration)
            .await?;
        Ok(page)
    }

    /// Number of `get_page` calls made for `url`.
    pub async fn access_count(&self, url: &str) -> Result<u64> {
        call_count(self.store.as_ref(), &count_key(url)).await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fetcher returning a numbered body and counting calls
    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("<html>{url} #{n}</html>"))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl PageFetcher for FailingFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            Err(CacheError::HttpStatus {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    fn memory_store() -> Arc<dyn KvStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_keys() {
        assert_eq!(count_key("http://a.test"), "count:http://a.test");
        assert_eq!(cached_key("http://a.test"), "cached:http://a.test");
    }

    #[test]
    fn test_zero_expiration_rejected() {
        let result = PageCache::with_expiration(memory_store(), CountingFetcher::default(), 0);
        assert!(matches!(result, Err(CacheError::InvalidExpiry(_))));
    }

    #[test]
    fn test_out_of_range_expiration_rejected() {
        let result = PageCache::with_expiration(
            memory_store(),
            CountingFetcher::default(),
            u64::MAX / 100,
        );
        assert!(matches!(result, Err(CacheError::InvalidExpiry(_))));
    }

    #[test]
    fn test_default_expiration() {
        let cache = PageCache::new(memory_store(), CountingFetcher::default());
        assert_eq!(cache.expiration(), 10);
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_hits_cache() {
        let cache = PageCache::new(memory_store(), CountingFetcher::default());

        let first = cache.get_page("http://a.test").await.unwrap();
        let second = cache.get_page("http://a.test").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.access_count("http://a.test").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_refetch_after_expiration() {
        let cache =
            PageCache::with_expiration(memory_store(), CountingFetcher::default(), 1).unwrap();

        let first = cache.get_page("http://a.test").await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        let second = cache.get_page("http://a.test").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.access_count("http://a.test").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_urls_are_cached_independently() {
        let cache = PageCache::new(memory_store(), CountingFetcher::default());

        cache.get_page("http://a.test").await.unwrap();
        cache.get_page("http://b.test").await.unwrap();
        cache.get_page("http://a.test").await.unwrap();

        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.access_count("http://a.test").await.unwrap(), 2);
        assert_eq!(cache.access_count("http://b.test").await.unwrap(), 1);
        assert_eq!(cache.access_count("http://never.test").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_counted_but_not_cached() {
        let store = memory_store();
        let cache = PageCache::new(store.clone(), FailingFetcher);

        let result = cache.get_page("http://down.test").await;

        assert!(matches!(
            result,
            Err(CacheError::HttpStatus { status: 503, .. })
        ));
        assert_eq!(cache.access_count("http://down.test").await.unwrap(), 1);
        assert_eq!(store.get("cached:http://down.test").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cached_entry_has_ttl() {
        let store = Arc::new(MemoryStore::new());
        let cache = PageCache::new(store.clone(), CountingFetcher::default());

        cache.get_page("http://a.test").await.unwrap();

        let ttl = store.ttl_ms("cached:http://a.test").await.unwrap();
        assert!(ttl <= 10_000);
        assert!(ttl >= 9_000);
        assert!(store.ttl_ms("count:http://a.test").await.is_none());
    }
}
