//! Page Module
//!
//! Expiring cache of fetched web pages with per-URL access counting.

mod fetcher;
mod page_cache;

pub use fetcher::{HttpFetcher, PageFetcher};
pub use page_cache::{cached_key, count_key, PageCache};
