//! StateGraph - the builder that declares nodes, edges and schema, then
//! compiles them into an immutable executable graph.
//!
//! # Quick Start
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
//!         .field("total_usd", MergePolicy::Overwrite),
//! );
//!
//! graph.add_node("calc_total", |_ctx, state| async move {
//!     let amount = state["amount_usd"].as_f64().unwrap_or(0.0);
//!     Ok(json!({"total_usd": amount * 1.08}))
//! });
//!
//! graph.add_edge(START, "calc_total");
//! graph.add_edge("calc_total", END);
//!
//! let compiled = graph.compile()?;
//! let outcome = compiled.invoke(json!({"amount_usd": 1000.0})).await?;
//! let state = outcome.into_state().expect("no interrupts in this graph");
//! assert!((state["total_usd"].as_f64().unwrap() - 1080.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! # Conditional Routing
//!
//! A conditional edge pairs a routing function with a closed branch table.
//! The router inspects the post-merge state and returns a key; the key is
//! resolved through the table, and a key absent from the table is a fatal
//! configuration error - never a silent fallback:
//!
//! ```rust,ignore
//! graph.add_conditional_edges(
//!     "calc_total",
//!     |state| state["target_currency"].as_str().unwrap_or_default().to_string(),
//!     [("INR", "convert_to_inr"), ("EUR", "convert_to_eur")],
//! );
//! ```
//!
//! # Validation
//!
//! `compile()` fails fast on structural mistakes so traversal never has to
//! discover them: duplicate node ids, a second outgoing edge for one source,
//! edges into unregistered nodes, branch tables with unregistered targets,
//! and a missing START edge are all rejected before an executable graph
//! exists.

use crate::compiled::CompiledGraph;
use crate::error::{GraphError, NodeError, Result};
use crate::graph::{Edge, Graph, NodeExecutor, NodeId, NodeSpec, RouterFn, START};
use crate::interrupt::NodeContext;
use crate::state::{MergePolicy, StateSchema};
use agentgraph_checkpoint::CheckpointStore;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Mutable builder producing an immutable [`CompiledGraph`].
#[derive(Default)]
pub struct StateGraph {
    schema: StateSchema,
    nodes: Vec<(NodeId, NodeSpec)>,
    edges: Vec<(NodeId, Edge)>,
}

impl StateGraph {
    /// Empty builder with an empty schema. Declare fields with
    /// [`with_schema`](Self::with_schema) - an undeclared field rejects all
    /// writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder over an explicit state schema.
    pub fn with_schema(schema: StateSchema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    /// Builder for conversational graphs: schema `{messages: Append}`.
    pub fn with_messages() -> Self {
        Self::with_schema(StateSchema::new().field(crate::messages::MESSAGES_FIELD, MergePolicy::Append))
    }

    /// Register a node from an async closure `(ctx, state) -> partial`.
    ///
    /// Registering the same id twice is reported at `compile()`.
    pub fn add_node<F, Fut>(&mut self, id: impl Into<NodeId>, executor: F) -> &mut Self
    where
        F: Fn(NodeContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Value, NodeError>> + Send + 'static,
    {
        let wrapped: NodeExecutor = Arc::new(move |ctx, state| Box::pin(executor(ctx, state)));
        self.add_node_executor(id, wrapped)
    }

    /// Register a node from an already-boxed executor (e.g. a prebuilt
    /// tool-dispatch node).
    pub fn add_node_executor(&mut self, id: impl Into<NodeId>, executor: NodeExecutor) -> &mut Self {
        let id = id.into();
        self.nodes.push((
            id.clone(),
            NodeSpec {
                name: id,
                executor,
            },
        ));
        self
    }

    /// Unconditional edge `from -> to`. Use [`START`]/[`END`] for the
    /// markers.
    pub fn add_edge(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> &mut Self {
        self.edges.push((from.into(), Edge::Direct(to.into())));
        self
    }

    /// Conditional edge: `router` maps the post-merge state to a key looked
    /// up in `branches`.
    pub fn add_conditional_edges<R, I, K, T>(
        &mut self,
        from: impl Into<NodeId>,
        router: R,
        branches: I,
    ) -> &mut Self
    where
        R: Fn(&Value) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<NodeId>,
    {
        let router: RouterFn = Arc::new(router);
        let branches: HashMap<String, NodeId> = branches
            .into_iter()
            .map(|(key, to)| (key.into(), to.into()))
            .collect();
        self.edges.push((from.into(), Edge::Conditional { router, branches }));
        self
    }

    /// Validate and produce the immutable executable graph.
    pub fn compile(self) -> Result<CompiledGraph> {
        let graph = self.build()?;
        CompiledGraph::new(graph)
    }

    /// Like [`compile`](Self::compile), with a checkpoint store attached for
    /// thread persistence and resumption.
    pub fn compile_with_checkpointer(self, store: Arc<dyn CheckpointStore>) -> Result<CompiledGraph> {
        let graph = self.build()?;
        Ok(CompiledGraph::new(graph)?.with_checkpointer(store))
    }

    fn build(self) -> Result<Graph> {
        let mut nodes = HashMap::new();
        for (id, spec) in self.nodes {
            if id == START || id == crate::graph::END {
                return Err(GraphError::configuration(format!(
                    "'{id}' is a reserved marker and cannot be a node id"
                )));
            }
            if nodes.insert(id.clone(), spec).is_some() {
                return Err(GraphError::configuration(format!(
                    "duplicate node id '{id}'"
                )));
            }
        }

        let mut edges = HashMap::new();
        for (from, edge) in self.edges {
            if edges.insert(from.clone(), edge).is_some() {
                return Err(GraphError::configuration(format!(
                    "node '{from}' already has an outgoing edge"
                )));
            }
        }

        let graph = Graph {
            nodes,
            edges,
            schema: self.schema,
        };
        graph.validate().map_err(GraphError::Configuration)?;
        Ok(graph)
    }
}
