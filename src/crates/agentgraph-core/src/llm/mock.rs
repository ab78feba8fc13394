//! Scripted model - the deterministic test double for [`ChatModel`].
//!
//! Responses are queued up front and popped one per `chat()` call; every
//! request is recorded for assertions. An exhausted script is a request
//! error, which doubles as a cheap way to exercise collaborator-failure
//! paths.

use super::{ChatModel, ChatRequest, LlmError};
use crate::messages::Message;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Deterministic [`ChatModel`] that replays canned responses in order.
///
/// # Example
///
/// ```rust
/// use agentgraph_core::llm::{ChatModel, ChatRequest, ScriptedModel};
/// use agentgraph_core::Message;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let model = ScriptedModel::new().with_response(Message::assistant("hello"));
///
/// let reply = model
///     .chat(ChatRequest::new(vec![Message::user("hi")]))
///     .await
///     .unwrap();
/// assert_eq!(reply.content, "hello");
/// assert_eq!(model.requests().len(), 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedModel {
    script: Mutex<VecDeque<Message>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    /// Empty script; every call fails until responses are queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response (builder form).
    pub fn with_response(self, message: Message) -> Self {
        self.push_response(message);
        self
    }

    /// Queue a response on a shared instance.
    pub fn push_response(&self, message: Message) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(message);
    }

    /// Responses left in the script.
    pub fn remaining(&self) -> usize {
        self.script.lock().expect("script lock poisoned").len()
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, request: ChatRequest) -> Result<Message, LlmError> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request);
        self.script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .ok_or_else(|| LlmError::Request("scripted model is out of responses".to_string()))
    }
}
