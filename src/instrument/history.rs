//! Call History
//!
//! Wrapper recording every call's input and output in two parallel lists.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::instrument::Operation;
use crate::store::KvStore;

/// Key of the list holding the inputs of `name`.
pub fn inputs_key(name: &str) -> String {
    format!("{name}:inputs")
}

/// Key of the list holding the outputs of `name`.
pub fn outputs_key(name: &str) -> String {
    format!("{name}:outputs")
}

// == Recorded ==
/// Appends the `Debug` form of the arguments to `<name>:inputs`, runs the
/// inner operation, and appends the `Display` form of its result to
/// `<name>:outputs`.
///
/// The append/run/append sequence holds a per-wrapper lock, so both lists
/// stay index-aligned for every caller going through this wrapper. Writers
/// in other processes sharing the same store are not serialized.
///
/// A failing call records `error: <message>` as its output to keep the
/// lists aligned, then returns the error unchanged.
pub struct Recorded<O> {
    inner: O,
    store: Arc<dyn KvStore>,
    inputs_key: String,
    outputs_key: String,
    lock: Mutex<()>,
}

impl<O: Operation> Recorded<O> {
    /// Wraps `inner`, keeping its history in `store`.
    pub fn new(inner: O, store: Arc<dyn KvStore>) -> Self {
        let name = inner.name();
        Self {
            inputs_key: inputs_key(name),
            outputs_key: outputs_key(name),
            inner,
            store,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl<O> Operation for Recorded<O>
where
    O: Operation,
    O::Args: fmt::Debug,
    O::Output: fmt::Display,
{
    type Args = O::Args;
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn invoke(&self, args: Self::Args) -> Result<Self::Output> {
        let _guard = self.lock.lock().await;

        let input = format!("{args:?}");
        self.store
            .rpush(&self.inputs_key, input.clone().into_bytes())
            .await?;

        match self.inner.invoke(args).await {
            Ok(output) => {
                let rendered = output.to_string();
                debug!(operation = self.name(), %input, output = %rendered, "call recorded");
                self.store
                    .rpush(&self.outputs_key, rendered.into_bytes())
                    .await?;
                Ok(output)
            }
            Err(err) => {
                let marker = format!("error: {err}");
                let pushed = self
                    .store
                    .rpush(&self.outputs_key, marker.into_bytes())
                    .await;
                if let Err(push_err) = pushed {
                    warn!(operation = self.name(), error = %push_err, "failed to record error output");
                }
                Err(err)
            }
        }
    }
}
