//! Error types for graph construction and execution.
//!
//! The taxonomy separates what the *caller* must handle:
//!
//! - [`GraphError::Configuration`] - the graph or tool wiring is wrong
//!   (unknown edge target, routing key missing from its table, duplicate
//!   node, unregistered tool). Fatal; raised at build time or on first
//!   dispatch, never after a partial checkpoint write.
//! - [`GraphError::Collaborator`] - an external call (LLM, tool) failed. The
//!   step aborts; the checkpoint taken before the step remains valid, so the
//!   same invocation can be retried by the caller.
//! - [`GraphError::StateInvariant`] - a node produced an update for a field
//!   the schema does not declare. Fatal, no checkpoint write.
//! - [`GraphError::Execution`] - runtime misuse (resume without a pending
//!   interrupt, recursion limit exceeded, malformed state).
//!
//! Suspension is deliberately **not** an error: a paused run comes back as
//! `Ok(RunOutcome::Interrupted(..))` so callers can distinguish it from both
//! completion and failure without matching error variants.
//!
//! [`NodeError`] is the narrower error a node executor returns; the executor
//! maps it onto `GraphError` with node context attached.

use serde_json::Value;
use thiserror::Error;

/// Convenience result type using [`GraphError`].
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors surfaced to callers of the graph builder and executor.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The graph structure or tool wiring is invalid. Raised at compile time
    /// where possible, or at the offending dispatch otherwise.
    #[error("Graph configuration error: {0}")]
    Configuration(String),

    /// An external collaborator (model or tool) failed inside a node. The
    /// prior checkpoint is untouched and the step can be retried.
    #[error("Collaborator failure in node '{node}': {message}")]
    Collaborator {
        /// Node whose collaborator call failed.
        node: String,
        /// Failure description from the collaborator.
        message: String,
    },

    /// A partial state update referenced a field absent from the declared
    /// schema, or a merge policy was applied to an incompatible value.
    #[error("State invariant violated: {0}")]
    StateInvariant(String),

    /// Runtime misuse or a guard tripping (recursion limit, resume of a
    /// thread with nothing pending, ...).
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Checkpoint persistence failed.
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] agentgraph_checkpoint::CheckpointError),

    /// State could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GraphError {
    /// Configuration error with a formatted message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Collaborator failure with node context.
    pub fn collaborator(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            node: node.into(),
            message: message.into(),
        }
    }

    /// Execution error with a formatted message.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }
}

/// Error returned by a node executor.
///
/// `Interrupt` is control flow, not failure: it asks the executor to
/// checkpoint and hand a [`PendingInterrupt`](crate::PendingInterrupt) back
/// to the caller. The remaining variants are mapped onto [`GraphError`] with
/// the node name attached.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The node (or a tool it ran) needs external input before it can
    /// finish. Raised by [`NodeContext::interrupt`](crate::NodeContext::interrupt).
    #[error("interrupt requested")]
    Interrupt {
        /// Caller-defined payload describing what is needed.
        payload: Value,
    },

    /// An external collaborator call failed.
    #[error("collaborator failure: {0}")]
    Collaborator(String),

    /// The node hit a wiring problem (e.g. an unregistered tool).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The node produced or read state that violates the declared schema.
    #[error("state invariant violated: {0}")]
    StateInvariant(String),
}
