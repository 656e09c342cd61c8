//! Redis Memo - instrumented caches over a key-value store
//!
//! Provides a value cache that records call counts and input/output history
//! for its `store` operation, and a page cache that keeps fetched pages for
//! a fixed time while counting every access.

pub mod cache;
pub mod config;
pub mod error;
pub mod instrument;
pub mod logging;
pub mod page;
pub mod store;

pub use cache::{StoredValue, ValueCache, STORE_QUALNAME};
pub use config::Config;
pub use error::{CacheError, Result};
pub use logging::init_tracing;
pub use page::{HttpFetcher, PageCache, PageFetcher};
pub use store::{KvStore, MemoryStore, RedisStore};
