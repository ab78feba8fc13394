//! Core checkpoint data structures.
//!
//! A [`Checkpoint`] is the persisted snapshot of one conversation thread:
//! the [`ExecutionState`] the executor needs to continue, plus an id and a
//! timestamp for observability. The store keeps the latest snapshot per
//! thread and overwrites it on every completed step.
//!
//! # Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Checkpoint                                  │
//! │  • id: "uuid-abc"                            │
//! │  • thread_id: "buy-thread"                   │
//! │  • ts: 2024-01-01T12:00:00Z                  │
//! │  ┌────────────────────────────────────────┐  │
//! │  │  ExecutionState                        │  │
//! │  │  • values: { "messages": [...] }       │  │
//! │  │  • next_node: "tools"                  │  │
//! │  │  • pending_interrupt: Some(..)         │  │
//! │  │  • resume_log: ["yes"]                 │  │
//! │  │  • step: 4                             │  │
//! │  └────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! All types serialize with serde so any backend that can store JSON (or
//! bytes, via the serializer protocol) can persist them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Stable identifier of an independent conversation/execution lineage.
pub type ThreadId = String;

/// Payload describing what a suspended thread is waiting on.
///
/// Produced when a node calls `interrupt()` with no logged answer left to
/// consume. The `payload` is opaque to the engine, typically a question for
/// a human ("Approve buying 10 MSFT stocks for $2003.00?"). `interrupt_index`
/// records which interrupt call within the node execution raised it, so a
/// node that asks twice suspends once per unanswered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingInterrupt {
    /// Node that raised the interrupt.
    pub node: String,

    /// Caller-defined payload (e.g. an approval prompt).
    pub payload: Value,

    /// Zero-based index of the interrupt call site within the node run.
    pub interrupt_index: usize,
}

/// The live state of one thread's graph execution.
///
/// Owned by exactly one executor run at a time; persisted snapshots are
/// owned by the checkpoint store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionState {
    /// Schema-conforming state values (a JSON object).
    pub values: Value,

    /// The node the executor will run next (may be the END marker).
    pub next_node: String,

    /// Set while the thread is suspended waiting for a resume value.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pending_interrupt: Option<PendingInterrupt>,

    /// Ordered answers for the interrupted node's replay. The n-th
    /// `interrupt()` call during the re-run consumes the n-th entry. Cleared
    /// when the node completes.
    #[serde(default)]
    pub resume_log: Vec<Value>,

    /// Number of node executions completed on this thread so far.
    #[serde(default)]
    pub step: u64,
}

impl ExecutionState {
    /// Create a fresh execution state positioned at `next_node`.
    pub fn new(values: Value, next_node: impl Into<String>) -> Self {
        Self {
            values,
            next_node: next_node.into(),
            pending_interrupt: None,
            resume_log: Vec::new(),
            step: 0,
        }
    }

    /// True while the thread is waiting on a resume value.
    pub fn is_suspended(&self) -> bool {
        self.pending_interrupt.is_some()
    }
}

/// Persisted snapshot of a thread: `(thread_id, ExecutionState)` plus
/// identity and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Unique id of this snapshot.
    pub id: String,

    /// Thread the snapshot belongs to.
    pub thread_id: ThreadId,

    /// When the snapshot was taken.
    pub ts: DateTime<Utc>,

    /// The state needed to continue execution.
    pub state: ExecutionState,
}

impl Checkpoint {
    /// Snapshot `state` for `thread_id` with a fresh id and timestamp.
    pub fn new(thread_id: impl Into<ThreadId>, state: ExecutionState) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            thread_id: thread_id.into(),
            ts: Utc::now(),
            state,
        }
    }
}
