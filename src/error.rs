//! Error types for the value and page caches
//!
//! Provides unified error handling using thiserror. A missing key is never
//! an error: lookups return `Option` and only store, fetch, and conversion
//! failures surface here.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store could not be reached or rejected the command
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    /// Operation against a key holding the wrong kind of value
    #[error("Wrong type for key: {0}")]
    WrongType(String),

    /// Increment on a value that is not an integer
    #[error("Value at key is not an integer: {0}")]
    NotAnInteger(String),

    /// Expiration must be at least one second
    #[error("Invalid expiration for key: {0}")]
    InvalidExpiry(String),

    /// Stored bytes could not be converted to the requested type
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// The HTTP request itself failed (connect, timeout, body read)
    #[error("Fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message() {
        let err = CacheError::HttpStatus {
            url: "http://localhost/missing".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404 while fetching http://localhost/missing"
        );
    }

    #[test]
    fn test_conversion_message() {
        let err = CacheError::Conversion("invalid digit found in string".to_string());
        assert!(err.to_string().starts_with("Conversion failed"));
    }
}
