//! Core graph data structures.
//!
//! A [`Graph`] is the validated, immutable structure the executor walks:
//! named nodes (each an async `State → PartialState` function), an edge
//! table mapping every node to either a single successor or a conditional
//! router, and the declared state schema. Built through
//! [`StateGraph`](crate::builder::StateGraph), never by hand.
//!
//! ```text
//!  __start__ ──► chatbot ──┬─ "tools" ──► tools ──► chatbot (loop)
//!                          └─ "__end__" ──► __end__
//! ```

use crate::error::NodeError;
use crate::interrupt::NodeContext;
use crate::state::StateSchema;
use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Node identifier - unique name within a graph.
pub type NodeId = String;

/// Virtual entry marker. Carries no node function; its outgoing edge decides
/// where execution begins.
pub const START: &str = "__start__";

/// Virtual exit marker. Reaching it completes the run.
pub const END: &str = "__end__";

/// Async node function: full state in, partial update out.
pub type NodeExecutor = Arc<
    dyn Fn(NodeContext, Value) -> BoxFuture<'static, std::result::Result<Value, NodeError>>
        + Send
        + Sync,
>;

/// Routing function for conditional edges: post-merge state → routing key.
///
/// Must be total over reachable states; the returned key is looked up in the
/// edge's branch table and a miss is a fatal configuration error.
pub type RouterFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// A registered node: its name and executor.
#[derive(Clone)]
pub struct NodeSpec {
    /// Unique node name.
    pub name: NodeId,
    /// The node function.
    pub executor: NodeExecutor,
}

impl fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSpec")
            .field("name", &self.name)
            .field("executor", &"<fn>")
            .finish()
    }
}

/// Transition rule out of a node.
#[derive(Clone)]
pub enum Edge {
    /// Unconditional successor.
    Direct(NodeId),
    /// Router plus key → successor table. Every table value must name a
    /// registered node or [`END`]; the router must return a key in the table.
    Conditional {
        /// Computes the routing key from the just-merged state.
        router: RouterFn,
        /// Closed table of routing keys to successors.
        branches: HashMap<String, NodeId>,
    },
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Direct(to) => f.debug_tuple("Direct").field(to).finish(),
            Edge::Conditional { branches, .. } => f
                .debug_struct("Conditional")
                .field("router", &"<fn>")
                .field("branches", branches)
                .finish(),
        }
    }
}

/// Validated graph structure consumed by the executor.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: HashMap<NodeId, NodeSpec>,
    pub(crate) edges: HashMap<NodeId, Edge>,
    pub(crate) schema: StateSchema,
}

impl Graph {
    /// The spec registered under `id`.
    pub(crate) fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.get(id)
    }

    /// The outgoing edge of `id`.
    pub(crate) fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Declared state schema.
    pub fn schema(&self) -> &StateSchema {
        &self.schema
    }

    /// Registered node names.
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    /// Structural validation: every edge endpoint and branch target must
    /// reference a registered node or a marker, and START must lead
    /// somewhere. Called by `compile()`; failures are fatal at build time.
    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        if !self.edges.contains_key(START) {
            return Err(format!("'{START}' has no outgoing edge"));
        }
        for (from, edge) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(format!("edge source '{from}' is not a registered node"));
            }
            match edge {
                Edge::Direct(to) => self.check_target(from, to)?,
                Edge::Conditional { branches, .. } => {
                    if branches.is_empty() {
                        return Err(format!("conditional edge from '{from}' has no branches"));
                    }
                    for to in branches.values() {
                        self.check_target(from, to)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_target(&self, from: &str, to: &str) -> std::result::Result<(), String> {
        if to != END && !self.nodes.contains_key(to) {
            return Err(format!(
                "edge target '{to}' (from '{from}') is not a registered node"
            ));
        }
        Ok(())
    }
}
