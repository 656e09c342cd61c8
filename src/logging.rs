//! Logging setup
//!
//! Installs a `tracing` subscriber for applications embedding the caches.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "redis_memo=info";

/// Initializes the global tracing subscriber with an env filter.
///
/// Defaults to [`DEFAULT_FILTER`], can be overridden with the `RUST_LOG`
/// env var. Returns `false` when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
