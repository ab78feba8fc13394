//! Message types for model and tool communication.
//!
//! A [`Message`] is one entry in the conversation history kept under the
//! `"messages"` state field (append policy). Assistant messages may carry
//! structured [`ToolCall`] requests; tool messages answer them, linked by
//! `tool_call_id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GraphError, Result};

/// State field conventionally holding the conversation history.
pub const MESSAGES_FIELD: &str = "messages";

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Standing instructions for the model.
    System,
    /// End-user input.
    User,
    /// Model output (may request tool calls).
    Assistant,
    /// Result of a tool invocation.
    Tool,
}

/// Model-emitted intent to invoke a named tool with arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlates the eventual tool result with this request.
    pub id: String,
    /// Registered tool name.
    pub name: String,
    /// Arguments, matching the tool's declared parameter schema.
    pub args: Value,
}

impl ToolCall {
    /// Create a tool call request.
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args,
        }
    }
}

/// One conversation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced it.
    pub role: MessageRole,
    /// Text content.
    pub content: String,
    /// Outstanding tool-call requests (assistant messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For tool messages: the request this answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Optional producer name (e.g. the tool that ran).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    /// Message with an explicit role.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// System instructions.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// End-user input.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Model output.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Tool result answering `tool_call_id`.
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        let mut message = Self::new(MessageRole::Tool, content);
        message.tool_call_id = Some(tool_call_id.into());
        message
    }

    /// Attach tool-call requests.
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    /// Attach a producer name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// True if this message carries outstanding tool-call requests.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Read the conversation history out of a state object. An absent field is
/// an empty history; a malformed one is a state-invariant violation.
pub fn messages_from_state(state: &Value) -> Result<Vec<Message>> {
    match state.get(MESSAGES_FIELD) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            GraphError::StateInvariant(format!("'{MESSAGES_FIELD}' is not a message list: {e}"))
        }),
    }
}

/// The most recent message, if any.
pub fn last_message(messages: &[Message]) -> Option<&Message> {
    messages.last()
}

/// Partial state update appending `messages` to the history.
pub fn messages_update(messages: Vec<Message>) -> Result<Value> {
    Ok(serde_json::json!({ MESSAGES_FIELD: serde_json::to_value(messages)? }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roles_serialize_lowercase() {
        let encoded = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(encoded, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn tool_calls_round_trip() {
        let message = Message::assistant("")
            .with_tool_calls(vec![ToolCall::new("c1", "get_stock_price", json!({"symbol": "MSFT"}))]);
        assert!(message.has_tool_calls());

        let encoded = serde_json::to_value(&message).unwrap();
        let decoded: Message = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.tool_calls[0].name, "get_stock_price");
        assert_eq!(decoded.tool_calls[0].args["symbol"], "MSFT");
    }

    #[test]
    fn state_without_messages_is_empty_history() {
        assert!(messages_from_state(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn malformed_history_is_an_invariant_error() {
        let err = messages_from_state(&json!({"messages": 42})).unwrap_err();
        assert!(matches!(err, GraphError::StateInvariant(_)));
    }

    #[test]
    fn update_wraps_messages_field() {
        let update = messages_update(vec![Message::tool("200.3", "c1")]).unwrap();
        assert_eq!(update["messages"][0]["tool_call_id"], "c1");
    }
}
