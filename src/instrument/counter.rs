//! Call Counter
//!
//! Wrapper incrementing a per-operation counter before every call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::instrument::Operation;
use crate::store::KvStore;

// == Counted ==
/// Increments the counter stored under the operation's name, then delegates.
///
/// The increment happens before the inner operation runs, so failed calls
/// are counted too.
pub struct Counted<O> {
    inner: O,
    store: Arc<dyn KvStore>,
}

impl<O: Operation> Counted<O> {
    /// Wraps `inner`, keeping its counter in `store`.
    pub fn new(inner: O, store: Arc<dyn KvStore>) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl<O: Operation> Operation for Counted<O> {
    type Args = O::Args;
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn invoke(&self, args: Self::Args) -> Result<Self::Output> {
        let count = self.store.incr(self.name()).await?;
        debug!(operation = self.name(), count, "call counted");
        self.inner.invoke(args).await
    }
}

// == Call Count ==
/// Reads the number of recorded invocations of `name`.
///
/// An operation that was never called has a count of zero.
pub async fn call_count(store: &dyn KvStore, name: &str) -> Result<u64> {
    match store.get(name).await? {
        Some(raw) => std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CacheError::NotAnInteger(name.to_string())),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    struct Echo;

    #[async_trait]
    impl Operation for Echo {
        type Args = u32;
        type Output = u32;

        fn name(&self) -> &str {
            "Echo.run"
        }

        async fn invoke(&self, args: u32) -> Result<u32> {
            Ok(args)
        }
    }

    struct Failing;

    #[async_trait]
    impl Operation for Failing {
        type Args = ();
        type Output = ();

        fn name(&self) -> &str {
            "Failing.run"
        }

        async fn invoke(&self, _args: ()) -> Result<()> {
            Err(CacheError::Conversion("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn test_counter_increments_per_call() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let op = Counted::new(Echo, store.clone());

        assert_eq!(call_count(store.as_ref(), "Echo.run").await.unwrap(), 0);

        for i in 0..3 {
            assert_eq!(op.invoke(i).await.unwrap(), i);
        }

        assert_eq!(call_count(store.as_ref(), "Echo.run").await.unwrap(), 3);
        assert_eq!(op.name(), "Echo.run");
    }

    #[tokio::test]
    async fn test_counter_counts_failed_calls() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let op = Counted::new(Failing, store.clone());

        assert!(op.invoke(()).await.is_err());
        assert_eq!(call_count(store.as_ref(), "Failing.run").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_call_count_rejects_non_integer() {
        let store = MemoryStore::new();
        store.set("Echo.run", b"many".to_vec()).await.unwrap();

        let result = call_count(&store, "Echo.run").await;
        assert!(matches!(result, Err(CacheError::NotAnInteger(_))));
    }
}
