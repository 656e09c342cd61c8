//! Store Module
//!
//! The key-value store collaborator the caches are built over, plus its
//! Redis-backed and in-process implementations.

mod entry;
mod memory;
mod redis_store;

use async_trait::async_trait;

use crate::error::{CacheError, Result};

pub use entry::{StoreEntry, StoreValue};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

// == Key Value Store ==
/// Minimal set of store primitives the caches need.
///
/// Implementations must make every single-key operation atomic. Nothing
/// here spans more than one key.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the bytes stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key` without expiration, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Stores `value` under `key`, expiring after `ttl_secs` seconds.
    async fn set_with_expiry(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()>;

    /// Increments the integer counter at `key` by one and returns the new value.
    ///
    /// A missing key counts from zero.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends `value` to the list at `key`, returning the new list length.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Returns the inclusive `start..=stop` slice of the list at `key`.
    ///
    /// Negative indexes count from the end, `-1` being the last element.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Removes every key. Destructive for anyone else sharing the store.
    async fn flush_all(&self) -> Result<()>;
}

// == Expiration Bounds ==
/// Longest accepted expiration: the largest millisecond count an `i64` holds.
pub const MAX_TTL_SECS: u64 = (i64::MAX / 1000) as u64;

/// Rejects expirations of zero or beyond [`MAX_TTL_SECS`].
pub(crate) fn validate_ttl(key: &str, ttl_secs: u64) -> Result<()> {
    if ttl_secs == 0 || ttl_secs > MAX_TTL_SECS {
        return Err(CacheError::InvalidExpiry(key.to_string()));
    }
    Ok(())
}

// == Range Resolution ==
/// Resolves a Redis-style inclusive range against a list of `len` elements.
///
/// Returns `None` when the range selects nothing.
pub(crate) fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}
