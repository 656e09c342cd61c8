//! In-Memory Store Module
//!
//! HashMap-backed implementation of [`KvStore`] with lazy TTL expiration.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::{resolve_range, validate_ttl, KvStore, StoreEntry, StoreValue};

// == Memory Store ==
/// In-process key-value store mirroring the Redis commands the caches use.
///
/// Expired entries are dropped when they are next touched, or in bulk with
/// [`MemoryStore::cleanup_expired`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of live (unexpired) keys.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|entry| !entry.is_expired()).count()
    }

    // == Is Empty ==
    /// Returns true if no live key is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Remaining TTL ==
    /// Returns the remaining TTL of `key` in milliseconds.
    ///
    /// `None` when the key is absent or never expires.
    pub async fn ttl_ms(&self, key: &str) -> Option<u64> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(StoreEntry::ttl_remaining_ms)
    }
}

/// Returns the live entry at `key`, evicting it first if it has expired.
fn live_entry<'a>(
    entries: &'a mut HashMap<String, StoreEntry>,
    key: &str,
) -> Option<&'a mut StoreEntry> {
    if entries.get(key).is_some_and(StoreEntry::is_expired) {
        debug!(key, "dropping expired entry");
        entries.remove(key);
    }
    entries.get_mut(key)
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(StoreEntry {
                value: StoreValue::Bytes(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoreEntry::new(StoreValue::Bytes(value), None));
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        validate_ttl(key, ttl_secs)?;

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            StoreEntry::new(StoreValue::Bytes(value), Some(ttl_secs)),
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        let Some(entry) = live_entry(&mut entries, key) else {
            entries.insert(
                key.to_string(),
                StoreEntry::new(StoreValue::Bytes(b"1".to_vec()), None),
            );
            return Ok(1);
        };

        let StoreValue::Bytes(bytes) = &mut entry.value else {
            return Err(CacheError::WrongType(key.to_string()));
        };

        let current: i64 = std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CacheError::NotAnInteger(key.to_string()))?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::NotAnInteger(key.to_string()))?;

        // Counters keep whatever TTL the key already had
        *bytes = next.to_string().into_bytes();
        Ok(next)
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(StoreEntry {
                value: StoreValue::List(items),
                ..
            }) => {
                items.push(value);
                Ok(items.len())
            }
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => {
                entries.insert(
                    key.to_string(),
                    StoreEntry::new(StoreValue::List(vec![value]), None),
                );
                Ok(1)
            }
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(StoreEntry {
                value: StoreValue::List(items),
                ..
            }) => Ok(resolve_range(items.len(), start, stop)
                .map(|(from, to)| items[from..=to].to_vec())
                .unwrap_or_default()),
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn flush_all(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        debug!(removed, "flushed in-memory store");
        Ok(())
    }
}
