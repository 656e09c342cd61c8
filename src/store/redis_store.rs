//! Redis Store Module
//!
//! [`KvStore`] implementation talking to a Redis server.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::store::{validate_ttl, KvStore};

// == Redis Store ==
/// Redis-backed store sharing one multiplexed, auto-reconnecting connection.
///
/// Cloning is cheap: clones share the same underlying connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    // == Constructor ==
    /// Connects to the Redis server at `url`.
    ///
    /// # Arguments
    /// * `url` - Connection URL, e.g. `redis://127.0.0.1:6379/0`
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Connected to Redis at {}", url);
        Ok(Self { conn })
    }

    /// Connects using the URL from the configuration.
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::connect(&config.redis_url).await
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        validate_ttl(key, ttl_secs)?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        let count: i64 = conn.incr(key, 1).await?;
        debug!(key, count, "incremented counter");
        Ok(count)
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        let mut conn = self.conn.clone();
        let len: usize = conn.rpush(key, value).await?;
        Ok(len)
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let items: Vec<Vec<u8>> = conn.lrange(key, start, stop).await?;
        Ok(items)
    }

    async fn flush_all(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("FLUSHDB").query_async::<()>(&mut conn).await?;
        info!("Flushed Redis database");
        Ok(())
    }
}
