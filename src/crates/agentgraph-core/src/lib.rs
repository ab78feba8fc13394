//! # agentgraph-core - Graph Execution Engine for Agent Workflows
//!
//! A directed graph of named processing nodes over a shared, schema-declared
//! state, with conditional branching, tool invocation, checkpointed threads,
//! and human-in-the-loop suspension/resume. Declare nodes and edges with
//! [`StateGraph`], compile into an immutable [`CompiledGraph`], and drive it
//! with `invoke`/`resume`.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  StateGraph (builder)                                         │
//! │  • add_node / add_edge / add_conditional_edges                │
//! │  • validates structure, then compile()                        │
//! └──────────────────────────┬────────────────────────────────────┘
//!                            ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  CompiledGraph (executor)                                     │
//! │                                                               │
//! │   START ──► node ──► merge(StateSchema) ──► route ──► ...     │
//! │               │                                               │
//! │               ├── NodeError::Interrupt ──► checkpoint +       │
//! │               │                            RunOutcome::       │
//! │               │                            Interrupted        │
//! │               └── collaborator error ──► abort step,          │
//! │                                          prior checkpoint     │
//! │                                          stays valid          │
//! └──────────────────────────┬────────────────────────────────────┘
//!                            ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  agentgraph-checkpoint                                        │
//! │  • ExecutionState snapshots keyed by thread_id                │
//! │  • resume log for interrupt replay                            │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Outcomes
//!
//! Callers receive exactly one of three things:
//!
//! | Outcome | Shape | Meaning |
//! |---------|-------|---------|
//! | Completed | `Ok(RunOutcome::Complete(state))` | END reached |
//! | Suspended | `Ok(RunOutcome::Interrupted(pending))` | awaiting `resume()` |
//! | Failed | `Err(GraphError)` | typed error, no automatic retry |
//!
//! ## Quick Start
//!
//! ```rust
//! use agentgraph_core::{MergePolicy, StateGraph, StateSchema, END, START};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = StateGraph::with_schema(
//!     StateSchema::new()
//!         .field("amount_usd", MergePolicy::Overwrite)
//!         .field("total_usd", MergePolicy::Overwrite)
//!         .field("total_inr", MergePolicy::Overwrite),
//! );
//!
//! graph.add_node("calc_total", |_ctx, state| async move {
//!     let amount = state["amount_usd"].as_f64().unwrap_or(0.0);
//!     Ok(json!({"total_usd": amount * 1.08}))
//! });
//! graph.add_node("convert_to_inr", |_ctx, state| async move {
//!     let total = state["total_usd"].as_f64().unwrap_or(0.0);
//!     Ok(json!({"total_inr": total * 85.0}))
//! });
//!
//! graph.add_edge(START, "calc_total");
//! graph.add_edge("calc_total", "convert_to_inr");
//! graph.add_edge("convert_to_inr", END);
//!
//! let compiled = graph.compile()?;
//! let state = compiled
//!     .invoke(json!({"amount_usd": 100000.0}))
//!     .await?
//!     .into_state()
//!     .expect("this graph never suspends");
//!
//! assert!((state["total_inr"].as_f64().unwrap() - 9_180_000.0).abs() < 1e-3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Map
//!
//! - [`builder`] - [`StateGraph`] declaration API
//! - [`compiled`] - [`CompiledGraph`], [`RunConfig`], [`RunOutcome`]
//! - [`state`] - [`StateSchema`] and [`MergePolicy`]
//! - [`messages`] - [`Message`] / [`ToolCall`] conversation types
//! - [`interrupt`] - [`NodeContext`] and the resume-log replay contract
//! - [`tool`] - [`Tool`], [`ToolRegistry`], argument validation
//! - [`llm`] - [`ChatModel`] collaborator trait + [`ScriptedModel`] double
//! - [`visualization`] - Mermaid rendering
//! - [`error`] - [`GraphError`] / [`NodeError`] taxonomy

pub mod builder;
pub mod compiled;
pub mod error;
pub mod graph;
pub mod interrupt;
pub mod llm;
pub mod messages;
pub mod state;
pub mod tool;
pub mod visualization;

pub use builder::StateGraph;
pub use compiled::{CompiledGraph, RunConfig, RunOutcome};
pub use error::{GraphError, NodeError, Result};
pub use graph::{Edge, Graph, NodeExecutor, NodeId, RouterFn, END, START};
pub use interrupt::{NodeContext, PendingInterrupt};
pub use llm::{ChatModel, ChatRequest, LlmError, ScriptedModel, ToolDefinition};
pub use messages::{
    last_message, messages_from_state, messages_update, Message, MessageRole, ToolCall,
    MESSAGES_FIELD,
};
pub use state::{MergePolicy, StateSchema};
pub use tool::{Tool, ToolContext, ToolError, ToolRegistry};

// Checkpointing is part of the core contract; re-export the store types so
// most applications depend on this crate alone.
pub use agentgraph_checkpoint::{CheckpointStore, ExecutionState, InMemoryCheckpointStore};
