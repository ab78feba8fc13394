//! LLM collaborator interface.
//!
//! agentgraph is an orchestration engine, not an LLM client library: the
//! core defines the [`ChatModel`] trait and treats the model as an opaque,
//! possibly-slow, possibly-failing external call. Provider crates (OpenAI,
//! Anthropic, Ollama, ...) implement the trait outside this repository;
//! tests and demos use the deterministic [`ScriptedModel`].
//!
//! A model failure surfaces as a collaborator error: the current step
//! aborts, the previous checkpoint stays valid, and the caller may retry the
//! same invocation. The core never retries on its own.
//!
//! # Implementing a Provider
//!
//! ```rust,ignore
//! use agentgraph_core::llm::{ChatModel, ChatRequest, LlmError};
//! use agentgraph_core::Message;
//! use async_trait::async_trait;
//!
//! struct MyProvider { api_key: String }
//!
//! #[async_trait]
//! impl ChatModel for MyProvider {
//!     async fn chat(&self, request: ChatRequest) -> Result<Message, LlmError> {
//!         // 1. Convert request.messages + request.tools to the wire format
//!         // 2. POST to the provider
//!         // 3. Map the reply (and any tool calls) back onto Message
//!         todo!()
//!     }
//! }
//! ```

pub mod mock;

pub use mock::ScriptedModel;

use crate::messages::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from the model collaborator.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request could not be completed (network, auth, rate limit, ...).
    #[error("model request failed: {0}")]
    Request(String),

    /// The provider answered with something the adapter cannot interpret.
    #[error("model returned malformed output: {0}")]
    Malformed(String),
}

/// Declared shape of a tool offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Registered tool name.
    pub name: String,
    /// Description shown to the model.
    pub description: String,
    /// JSON parameter schema.
    pub parameters: Value,
}

/// One model invocation: the conversation so far plus bound tools.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// Conversation history, oldest first.
    pub messages: Vec<Message>,
    /// Tools the model may request.
    pub tools: Vec<ToolDefinition>,
}

impl ChatRequest {
    /// Request over a message history.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
        }
    }

    /// Bind tool definitions to the request.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}

/// Chat-based language model: `sequence of messages -> message`.
///
/// Implementations must be `Send + Sync`; share one across nodes with
/// `Arc<dyn ChatModel>`. Models supporting tool use return their requests in
/// the reply's `tool_calls` and accept tool-role messages in subsequent
/// requests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produce the next assistant message for the conversation.
    async fn chat(&self, request: ChatRequest) -> Result<Message, LlmError>;
}
