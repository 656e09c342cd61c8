//! Value Cache Module
//!
//! Stores values under random keys and keeps call statistics for `store`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::StoredValue;
use crate::error::{CacheError, Result};
use crate::instrument::{self, Counted, Operation, Recorded, Replay};
use crate::store::KvStore;

/// Qualified name of [`ValueCache::store`], root of its counter and history keys.
pub const STORE_QUALNAME: &str = "ValueCache.store";

// == Store Operation ==
/// Writes a value under a fresh UUID v4 key and returns the key.
struct StoreOp {
    store: Arc<dyn KvStore>,
}

#[async_trait]
impl Operation for StoreOp {
    type Args = (StoredValue,);
    type Output = String;

    fn name(&self) -> &str {
        STORE_QUALNAME
    }

    async fn invoke(&self, args: (StoredValue,)) -> Result<String> {
        let (data,) = args;
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, data.into_bytes()).await?;
        Ok(key)
    }
}

// == Value Cache ==
/// Key-value façade assigning random keys to stored values.
///
/// Holds no state of its own: values, counters, and history all live in the
/// injected store. `store` is counted and recorded, lookups are not.
pub struct ValueCache {
    store: Arc<dyn KvStore>,
    store_op: Counted<Recorded<StoreOp>>,
}

impl ValueCache {
    // == Constructor ==
    /// Creates a cache over `store`.
    ///
    /// **Destructive:** flushes every key in the store first, including keys
    /// written by anyone else sharing it.
    pub async fn new(store: Arc<dyn KvStore>) -> Result<Self> {
        store.flush_all().await?;
        info!("Value cache initialized, store flushed");

        let store_op = Counted::new(
            Recorded::new(
                StoreOp {
                    store: store.clone(),
                },
                store.clone(),
            ),
            store.clone(),
        );

        Ok(Self { store, store_op })
    }

    // == Store ==
    /// Stores `data` under a new random key and returns that key.
    pub async fn store(&self, data: impl Into<StoredValue>) -> Result<String> {
        let key = self.store_op.invoke((data.into(),)).await?;
        debug!(%key, "stored value");
        Ok(key)
    }

    /// Qualified name under which `store` keeps its counter and history.
    pub fn store_qualname(&self) -> &str {
        self.store_op.name()
    }

    // == Get ==
    /// Returns the raw bytes stored under `key`, or `None` if there are none.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Returns the value under `key` passed through `convert`.
    ///
    /// `convert` is only called when the key exists; its error is returned
    /// as is.
    pub async fn get_with<T, F>(&self, key: &str, convert: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.get(key).await?.map(convert).transpose()
    }

    /// Returns the value under `key` decoded as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, decode_str).await
    }

    /// Returns the value under `key` parsed as an integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, parse_number).await
    }

    /// Returns the value under `key` parsed as a float.
    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, parse_number).await
    }

    // == History ==
    /// Number of times the operation `name` has been called.
    pub async fn call_count(&self, name: &str) -> Result<u64> {
        instrument::call_count(self.store.as_ref(), name).await
    }

    /// Call count and recorded history of the operation `name`.
    pub async fn replay(&self, name: &str) -> Result<Replay> {
        instrument::replay(self.store.as_ref(), name).await
    }
}

fn decode_str(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|err| CacheError::Conversion(err.to_string()))
}

fn parse_number<T>(raw: Vec<u8>) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let text = decode_str(raw)?;
    text.trim()
        .parse()
        .map_err(|err: T::Err| CacheError::Conversion(format!("{text:?}: {err}")))
}
