//! Instrumentation Module
//!
//! Call counting, call recording, and replay for operations whose
//! bookkeeping lives in the key-value store.
//!
//! An operation is anything implementing [`Operation`]. Instrumentation
//! composes by wrapping: `Counted::new(Recorded::new(op, store), store)`
//! increments the counter first, then records the input, runs `op`, and
//! records the output.

mod counter;
mod history;
mod replay;

use async_trait::async_trait;

use crate::error::Result;

pub use counter::{call_count, Counted};
pub use history::{inputs_key, outputs_key, Recorded};
pub use replay::{replay, Replay, ReplayEntry};

// == Operation ==
/// A named, invokable capability.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Positional arguments, recorded through their `Debug` form
    type Args: Send + 'static;
    /// Value returned to the caller
    type Output: Send;

    /// Stable qualified name, the root of every key this operation owns.
    fn name(&self) -> &str;

    /// Runs the operation.
    async fn invoke(&self, args: Self::Args) -> Result<Self::Output>;
}
