//! # agentgraph-prebuilt - Ready-Made Agent Patterns
//!
//! The pieces every tool-calling chat agent rebuilds by hand, packaged:
//!
//! - **[`ToolNode`]** - graph node dispatching model-requested tool calls
//! - **[`tools_condition`]** - router deciding between the tool loop and END
//! - **[`create_chat_agent`]** - the full chatbot ⇄ tools graph in one call
//!
//! # The Chat Agent Loop
//!
//! ```text
//!  __start__ ──► chatbot ──┬─ tools_condition = "tools" ──► tools ─┐
//!                  ▲       │                                       │
//!                  └───────┼───────────────────────────────────────┘
//!                          └─ tools_condition = "__end__" ──► __end__
//! ```
//!
//! The chatbot node calls the model with the registered tool definitions
//! bound; while replies carry tool calls, the loop dispatches them and feeds
//! the results back; a plain reply ends the run.
//!
//! # Example
//!
//! ```rust
//! use agentgraph_core::{Message, ScriptedModel, Tool, ToolCall, ToolRegistry};
//! use agentgraph_prebuilt::{create_chat_agent, ChatAgentConfig};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tools = ToolRegistry::new();
//! tools.register(Tool::new(
//!     "get_stock_price",
//!     "Return the current price of a stock given the stock symbol",
//!     json!({
//!         "type": "object",
//!         "properties": {"symbol": {"type": "string"}},
//!         "required": ["symbol"]
//!     }),
//!     |args, _ctx| async move {
//!         let price = match args["symbol"].as_str().unwrap_or_default() {
//!             "MSFT" => 200.3,
//!             _ => 0.0,
//!         };
//!         Ok(json!(price))
//!     },
//! ));
//!
//! // Scripted stand-in for the real model: one tool call, then the answer.
//! let model = Arc::new(
//!     ScriptedModel::new()
//!         .with_response(Message::assistant("").with_tool_calls(vec![ToolCall::new(
//!             "c1",
//!             "get_stock_price",
//!             json!({"symbol": "MSFT"}),
//!         )]))
//!         .with_response(Message::assistant("MSFT trades at $200.30.")),
//! );
//!
//! let agent = create_chat_agent(model, tools, ChatAgentConfig::default())?;
//! let state = agent
//!     .invoke(json!({"messages": [Message::user("What is the MSFT price?")]}))
//!     .await?
//!     .into_state()
//!     .expect("no interrupts in this script");
//!
//! let messages = state["messages"].as_array().unwrap();
//! assert_eq!(messages.last().unwrap()["content"], "MSFT trades at $200.30.");
//! # Ok(())
//! # }
//! ```
//!
//! Human-in-the-loop tools work unchanged: a tool calling
//! `ctx.interrupt(..)` suspends the agent, and `agent.resume(thread, value)`
//! continues it (compile with a checkpointer via
//! [`ChatAgentConfig::with_checkpointer`]).

pub mod condition;
pub mod tool_node;

pub use condition::{tools_condition, TOOLS};
pub use tool_node::ToolNode;

use agentgraph_core::{
    messages_from_state, messages_update, ChatModel, ChatRequest, CompiledGraph, Message,
    MessageRole, NodeError, Result, StateGraph, ToolRegistry, END, START,
};
use agentgraph_checkpoint::CheckpointStore;
use std::sync::Arc;

/// Configuration for [`create_chat_agent`].
#[derive(Clone, Default)]
pub struct ChatAgentConfig {
    /// Standing instructions prepended once per model call (not persisted
    /// into the conversation state).
    pub system_prompt: Option<String>,
    /// Store enabling thread persistence, multi-turn memory and
    /// interrupt/resume.
    pub checkpointer: Option<Arc<dyn CheckpointStore>>,
}

impl ChatAgentConfig {
    /// Set the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Attach a checkpoint store.
    pub fn with_checkpointer(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.checkpointer = Some(store);
        self
    }
}

/// Build the standard tool-calling chat agent: a `chatbot` model node, a
/// `tools` dispatch node, and the conditional loop between them.
///
/// State schema is `{messages: Append}`; invoke with
/// `json!({"messages": [Message::user(..)]})`.
pub fn create_chat_agent(
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    config: ChatAgentConfig,
) -> Result<CompiledGraph> {
    let registry = Arc::new(tools);
    let definitions = registry.definitions();
    let tool_node = ToolNode::new(registry);
    let system_prompt = config.system_prompt;

    let mut graph = StateGraph::with_messages();

    graph.add_node("chatbot", move |_ctx, state| {
        let model = model.clone();
        let definitions = definitions.clone();
        let system_prompt = system_prompt.clone();
        async move {
            let mut messages = messages_from_state(&state)
                .map_err(|e| NodeError::StateInvariant(e.to_string()))?;
            if let Some(prompt) = &system_prompt {
                if !messages.iter().any(|m| m.role == MessageRole::System) {
                    messages.insert(0, Message::system(prompt.clone()));
                }
            }
            let reply = model
                .chat(ChatRequest::new(messages).with_tools(definitions))
                .await
                .map_err(|e| NodeError::Collaborator(e.to_string()))?;
            messages_update(vec![reply]).map_err(|e| NodeError::StateInvariant(e.to_string()))
        }
    });
    graph.add_node_executor(TOOLS, tool_node.executor());

    graph.add_edge(START, "chatbot");
    graph.add_conditional_edges("chatbot", tools_condition, [(TOOLS, TOOLS), (END, END)]);
    graph.add_edge(TOOLS, "chatbot");

    match config.checkpointer {
        Some(store) => graph.compile_with_checkpointer(store),
        None => graph.compile(),
    }
}
