//! Human-in-the-loop interrupts: pausing a node for external input.
//!
//! A node (or a tool it runs) can call [`NodeContext::interrupt`] to pause
//! the whole thread until a human supplies a value. The executor persists the
//! thread's checkpoint and hands the caller a
//! [`PendingInterrupt`](agentgraph_checkpoint::PendingInterrupt); `resume()`
//! later injects the answer and continues.
//!
//! # Replay Semantics (checkpoint-at-call-boundary)
//!
//! Suspension is only permitted at node granularity. On resume the
//! interrupted node **re-runs from the top**, and the resume value is
//! injected deterministically at the suspension call site via an ordered
//! per-thread log:
//!
//! ```text
//! first run      log = []            interrupt#0 → no answer → SUSPEND(q0)
//! resume("yes")  log = ["yes"]       interrupt#0 → "yes"
//!                                    interrupt#1 → no answer → SUSPEND(q1)
//! resume("no")   log = ["yes","no"]  interrupt#0 → "yes"
//!                                    interrupt#1 → "no"  → node completes
//! ```
//!
//! The n-th `interrupt()` call during one node execution consumes the n-th
//! logged answer; the first call past the log suspends again. When the node
//! finally completes, the log is cleared - answers are consumed by exactly
//! one node visit.
//!
//! # Side-Effect Guarantee
//!
//! Code *before* the suspending call re-runs on every resume and must be
//! idempotent (e.g. a price lookup). The effect *guarded by* the interrupt -
//! the thing you asked permission for - executes at most once, only after
//! the answer arrives:
//!
//! ```rust,ignore
//! let decision = ctx.interrupt(format!(
//!     "Approve buying {qty} {symbol} stocks for ${total:.2}?"
//! ))?;
//! if decision == "yes" {
//!     place_order(symbol, qty).await?; // runs once, after approval
//! }
//! ```
//!
//! # No Global State
//!
//! The context travels as an explicit argument into every node executor;
//! there is no process-wide interrupt registry. Two threads interrupting
//! concurrently never observe each other's logs.

use crate::error::NodeError;
use crate::graph::NodeId;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use agentgraph_checkpoint::PendingInterrupt;

/// Per-invocation context handed to every node executor.
///
/// Cheap to clone; clones share the interrupt cursor, so a node that fans
/// work out to helpers (e.g. a tool dispatcher running several tools in
/// order) keeps one consistent replay position.
#[derive(Debug, Clone)]
pub struct NodeContext {
    node: NodeId,
    thread_id: Option<String>,
    step: u64,
    resume_log: Arc<Vec<Value>>,
    cursor: Arc<AtomicUsize>,
}

impl NodeContext {
    /// Build a context directly. The executor does this for every node
    /// invocation; constructing one by hand is useful when unit-testing a
    /// node or tool outside a graph.
    pub fn new(
        node: impl Into<NodeId>,
        thread_id: Option<String>,
        step: u64,
        resume_log: Vec<Value>,
    ) -> Self {
        Self {
            node: node.into(),
            thread_id,
            step,
            resume_log: Arc::new(resume_log),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Name of the node being executed.
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Thread this run belongs to, if thread-tracked.
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// Number of node executions completed on this thread before this one.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Pause for external input, or replay a previously supplied answer.
    ///
    /// Returns the logged resume value for this call site if one exists;
    /// otherwise yields [`NodeError::Interrupt`], which the executor turns
    /// into a persisted suspension. Propagate it with `?` - do not catch it.
    pub fn interrupt(&self, payload: impl Into<Value>) -> Result<Value, NodeError> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        match self.resume_log.get(index) {
            Some(answer) => {
                tracing::debug!(node = %self.node, index, "replaying resume value");
                Ok(answer.clone())
            }
            None => {
                let payload = payload.into();
                tracing::debug!(node = %self.node, index, "interrupt requested");
                Err(NodeError::Interrupt { payload })
            }
        }
    }
}
