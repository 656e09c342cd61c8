//! Replay
//!
//! Read-only rendering of an operation's call count and recorded history.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::error::Result;
use crate::instrument::{call_count, inputs_key, outputs_key};
use crate::store::KvStore;

// == Replay Entry ==
/// One recorded call: its rendered input and output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayEntry {
    pub input: String,
    pub output: String,
}

// == Replay ==
/// Transcript of an operation's history in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replay {
    /// Qualified name of the operation
    pub operation: String,
    /// Value of the invocation counter
    pub calls: u64,
    /// Recorded (input, output) pairs, oldest first
    pub entries: Vec<ReplayEntry>,
}

impl Replay {
    /// Writes the transcript to stdout.
    pub fn print(&self) -> io::Result<()> {
        self.write_to(&mut io::stdout().lock())
    }

    /// Writes the transcript to `out`, exactly as `Display` renders it.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")?;
        out.flush()
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.operation, self.calls)?;
        // Each call renders as the operation applied to its splatted argument tuple
        for entry in &self.entries {
            writeln!(f, "{}(*{}) -> {}", self.operation, entry.input, entry.output)?;
        }
        Ok(())
    }
}

/// Reads the counter and history lists of `name` from `store`.
///
/// Inputs without a matching output (a call still in flight) are left out.
pub async fn replay(store: &dyn KvStore, name: &str) -> Result<Replay> {
    let calls = call_count(store, name).await?;
    let inputs = store.lrange(&inputs_key(name), 0, -1).await?;
    let outputs = store.lrange(&outputs_key(name), 0, -1).await?;

    let entries = inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| ReplayEntry {
            input: String::from_utf8_lossy(&input).into_owned(),
            output: String::from_utf8_lossy(&output).into_owned(),
        })
        .collect();

    Ok(Replay {
        operation: name.to_string(),
        calls,
        entries,
    })
}
