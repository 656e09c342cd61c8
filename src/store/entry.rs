//! Store Entry Module
//!
//! Defines the in-process representation of a stored key with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

// == Store Value ==
/// Payload held under a key: a plain byte string or a list of byte strings.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    /// Plain value written by `set` or `incr`
    Bytes(Vec<u8>),
    /// List value grown by `rpush`
    List(Vec<Vec<u8>>),
}

// == Store Entry ==
/// Represents a single key's value and expiration metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub value: StoreValue,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    pub fn new(value: StoreValue, ttl_seconds: Option<u64>) -> Self {
        let expires_at = ttl_seconds
            .map(|ttl| current_timestamp_ms().saturating_add(ttl.saturating_mul(1000)));

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the TTL has elapsed
    /// - `Some(remaining_ms)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
