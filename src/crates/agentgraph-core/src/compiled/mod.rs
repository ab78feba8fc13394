//! Compiled graph: the immutable, executable artifact.
//!
//! Produced by [`StateGraph::compile`](crate::builder::StateGraph::compile);
//! holds the validated structure, an optional checkpoint store, and the
//! per-thread locks that serialize runs against the same thread id.
//!
//! Submodules follow the executor's concerns:
//! - [`execution`] - the run loop (`invoke`, `resume`)
//! - [`state`] - thread-state inspection (`get_state`, `update_state`)

pub mod execution;
pub mod state;

use crate::error::Result;
use crate::graph::Graph;
use agentgraph_checkpoint::{CheckpointStore, PendingInterrupt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// How a run ended - the two *normal* outcomes, kept distinct from errors.
///
/// `Interrupted` is not a failure: the thread is checkpointed and waiting
/// for [`resume`](CompiledGraph::resume).
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Execution reached END; carries the final state.
    Complete(Value),
    /// Execution suspended; carries what the thread is waiting on.
    Interrupted(PendingInterrupt),
}

impl RunOutcome {
    /// True if the run reached END.
    pub fn is_complete(&self) -> bool {
        matches!(self, RunOutcome::Complete(_))
    }

    /// True if the run suspended.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, RunOutcome::Interrupted(_))
    }

    /// Final state, if the run completed.
    pub fn into_state(self) -> Option<Value> {
        match self {
            RunOutcome::Complete(state) => Some(state),
            RunOutcome::Interrupted(_) => None,
        }
    }

    /// The pending interrupt, if the run suspended.
    pub fn interrupt(&self) -> Option<&PendingInterrupt> {
        match self {
            RunOutcome::Complete(_) => None,
            RunOutcome::Interrupted(pending) => Some(pending),
        }
    }
}

/// Per-run configuration, passed explicitly - there is no ambient state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Conversation thread to load/persist checkpoints under. `None` runs
    /// stateless.
    pub thread_id: Option<String>,
    /// Maximum node executions in one run; trips
    /// [`GraphError::Execution`](crate::GraphError::Execution) when a cyclic
    /// graph (e.g. a tool loop) fails to converge.
    pub recursion_limit: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            thread_id: None,
            recursion_limit: 25,
        }
    }
}

impl RunConfig {
    /// Config tracking the given thread.
    pub fn thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Self::default()
        }
    }

    /// Override the recursion limit.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }
}

/// Lazily-created per-thread mutexes. No two runs against the same thread id
/// ever overlap; distinct threads run fully in parallel.
#[derive(Clone, Default)]
pub(crate) struct ThreadLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl ThreadLocks {
    pub(crate) async fn acquire(&self, thread_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(thread_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

/// Executable graph produced by the builder. Cloning shares the structure,
/// the checkpoint store, and the per-thread locks.
#[derive(Clone)]
pub struct CompiledGraph {
    pub(crate) graph: Graph,
    pub(crate) checkpointer: Option<Arc<dyn CheckpointStore>>,
    pub(crate) thread_locks: ThreadLocks,
}

impl std::fmt::Debug for CompiledGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("graph", &self.graph)
            .field("has_checkpointer", &self.checkpointer.is_some())
            .finish()
    }
}

impl CompiledGraph {
    pub(crate) fn new(graph: Graph) -> Result<Self> {
        Ok(Self {
            graph,
            checkpointer: None,
            thread_locks: ThreadLocks::default(),
        })
    }

    /// Attach a checkpoint store for thread persistence and resumption.
    pub fn with_checkpointer(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.checkpointer = Some(store);
        self
    }

    /// The underlying validated structure.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mermaid flowchart of the structure (text only).
    pub fn mermaid(&self) -> String {
        crate::visualization::mermaid(&self.graph)
    }
}
