//! ToolNode - the graph node that executes model-requested tool calls.
//!
//! Reads the last message in state; if it is an assistant message carrying
//! [`ToolCall`](agentgraph_core::ToolCall) requests, each registered tool is
//! invoked **in request order** and exactly one tool-role result message is
//! appended per call.
//! An unregistered tool name is a configuration error - reported, never
//! silently ignored.
//!
//! A tool that interrupts (human-in-the-loop) suspends the whole node; on
//! resume the node re-runs from the first call, so tools running before the
//! suspension point must be idempotent (see the interrupt module's
//! replay contract).
//!
//! # Example
//!
//! ```rust,ignore
//! let tool_node = ToolNode::new(Arc::new(registry));
//! graph.add_node_executor("tools", tool_node.executor());
//! graph.add_edge("tools", "chatbot");
//! ```

use agentgraph_core::{
    last_message, messages_from_state, messages_update, Message, NodeContext, NodeError,
    NodeExecutor, ToolContext, ToolError, ToolRegistry,
};
use serde_json::Value;
use std::sync::Arc;

/// Dispatches the last message's tool calls against a shared registry.
#[derive(Clone)]
pub struct ToolNode {
    registry: Arc<ToolRegistry>,
}

impl ToolNode {
    /// Node over a registered tool set.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this node dispatches against.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run every tool call in the last message, in order, producing one
    /// tool-result message each.
    pub async fn execute(&self, ctx: NodeContext, state: Value) -> Result<Value, NodeError> {
        let messages = messages_from_state(&state)
            .map_err(|e| NodeError::StateInvariant(e.to_string()))?;
        let Some(last) = last_message(&messages) else {
            return messages_update(Vec::new())
                .map_err(|e| NodeError::StateInvariant(e.to_string()));
        };

        let mut results = Vec::with_capacity(last.tool_calls.len());
        for call in &last.tool_calls {
            let tool = self.registry.get(&call.name).ok_or_else(|| {
                NodeError::Configuration(format!("tool '{}' is not registered", call.name))
            })?;

            tracing::debug!(tool = %call.name, call_id = %call.id, "dispatching tool call");
            let tool_ctx = ToolContext::new(ctx.clone(), call.id.clone());
            match tool.execute(call.args.clone(), tool_ctx).await {
                Ok(output) => {
                    results.push(
                        Message::tool(render(&output), call.id.clone())
                            .with_name(call.name.clone()),
                    );
                }
                Err(ToolError::Interrupt { payload }) => {
                    return Err(NodeError::Interrupt { payload });
                }
                Err(err) => {
                    return Err(NodeError::Collaborator(format!(
                        "tool '{}' failed: {err}",
                        call.name
                    )));
                }
            }
        }

        messages_update(results).map_err(|e| NodeError::StateInvariant(e.to_string()))
    }

    /// Boxed executor for [`StateGraph::add_node_executor`].
    ///
    /// [`StateGraph::add_node_executor`]: agentgraph_core::StateGraph::add_node_executor
    pub fn executor(&self) -> NodeExecutor {
        let node = self.clone();
        Arc::new(move |ctx, state| {
            let node = node.clone();
            Box::pin(async move { node.execute(ctx, state).await })
        })
    }
}

/// Tool outputs are wrapped as message text: strings stay bare, everything
/// else renders as JSON.
fn render(output: &Value) -> String {
    match output {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
