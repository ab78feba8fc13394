//! Tool abstractions: declared, registered once, invoked via dispatch.
//!
//! A [`Tool`] couples a name, a description, a JSON parameter schema, and an
//! async handler. Models request tools through
//! [`ToolCall`](crate::messages::ToolCall) messages; the dispatcher looks the
//! tool up by name, type-checks the arguments against the declared schema,
//! and appends the result as a tool message.
//!
//! # Defining a Tool
//!
//! ```rust
//! use agentgraph_core::Tool;
//! use serde_json::json;
//!
//! let get_stock_price = Tool::new(
//!     "get_stock_price",
//!     "Return the current price of a stock given the stock symbol",
//!     json!({
//!         "type": "object",
//!         "properties": {"symbol": {"type": "string"}},
//!         "required": ["symbol"]
//!     }),
//!     |args, _ctx| async move {
//!         let symbol = args["symbol"].as_str().unwrap_or_default();
//!         let price = match symbol {
//!             "MSFT" => 200.3,
//!             "AAPL" => 100.4,
//!             "AMZN" => 150.0,
//!             "RIL" => 87.6,
//!             _ => 0.0,
//!         };
//!         Ok(json!(price))
//!     },
//! );
//! assert_eq!(get_stock_price.name(), "get_stock_price");
//! ```
//!
//! # Human-in-the-loop Tools
//!
//! Handlers receive a [`ToolContext`] whose `interrupt()` pauses the whole
//! thread (see [`crate::interrupt`]); propagate its error with `?`.

use crate::error::NodeError;
use crate::interrupt::NodeContext;
use crate::llm::ToolDefinition;
use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by tool validation and execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool needs external input; bubbles up as a node interrupt.
    #[error("interrupt requested")]
    Interrupt {
        /// Caller-defined payload (e.g. an approval prompt).
        payload: Value,
    },

    /// Supplied arguments do not match the declared parameter schema.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The handler itself failed.
    #[error("tool execution failed: {0}")]
    Execution(String),
}

impl From<ToolError> for NodeError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Interrupt { payload } => NodeError::Interrupt { payload },
            other => NodeError::Collaborator(other.to_string()),
        }
    }
}

/// Context handed to a tool handler for one call.
#[derive(Debug, Clone)]
pub struct ToolContext {
    node: NodeContext,
    tool_call_id: String,
}

impl ToolContext {
    /// Build a context for a single tool call.
    pub fn new(node: NodeContext, tool_call_id: impl Into<String>) -> Self {
        Self {
            node,
            tool_call_id: tool_call_id.into(),
        }
    }

    /// Id of the tool call being answered.
    pub fn tool_call_id(&self) -> &str {
        &self.tool_call_id
    }

    /// Pause the thread for external input (see
    /// [`NodeContext::interrupt`]). Replays the logged answer on re-run.
    pub fn interrupt(&self, payload: impl Into<Value>) -> Result<Value, ToolError> {
        match self.node.interrupt(payload) {
            Ok(answer) => Ok(answer),
            Err(NodeError::Interrupt { payload }) => Err(ToolError::Interrupt { payload }),
            Err(other) => Err(ToolError::Execution(other.to_string())),
        }
    }
}

/// Async tool handler: `(args, context) -> result`.
pub type ToolHandler =
    Arc<dyn Fn(Value, ToolContext) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync>;

/// A callable tool with declared name, description and parameter schema.
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    parameters: Value,
    handler: ToolHandler,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl Tool {
    /// Define a tool from an async closure.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handler: F,
    ) -> Self
    where
        F: Fn(Value, ToolContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
        }
    }

    /// Registered tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description shown to the model.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared JSON parameter schema.
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Definition for binding this tool to a model request.
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
        }
    }

    /// Validate arguments, then run the handler.
    pub async fn execute(&self, args: Value, ctx: ToolContext) -> Result<Value, ToolError> {
        self.validate_args(&args)?;
        (self.handler)(args, ctx).await
    }

    /// Type-check `args` against the declared parameter schema: required
    /// properties must be present and declared primitive types must match.
    pub fn validate_args(&self, args: &Value) -> Result<(), ToolError> {
        let args_obj = args.as_object().ok_or_else(|| {
            ToolError::InvalidArguments("arguments must be an object".to_string())
        })?;

        if let Some(required) = self.parameters.get("required").and_then(Value::as_array) {
            for field in required.iter().filter_map(Value::as_str) {
                if !args_obj.contains_key(field) {
                    return Err(ToolError::InvalidArguments(format!(
                        "missing required argument '{field}'"
                    )));
                }
            }
        }

        if let Some(properties) = self.parameters.get("properties").and_then(Value::as_object) {
            for (field, spec) in properties {
                let Some(value) = args_obj.get(field) else {
                    continue;
                };
                let Some(expected) = spec.get("type").and_then(Value::as_str) else {
                    continue;
                };
                let matches = match expected {
                    "string" => value.is_string(),
                    "number" => value.is_number(),
                    "integer" => value.is_i64() || value.is_u64(),
                    "boolean" => value.is_boolean(),
                    "array" => value.is_array(),
                    "object" => value.is_object(),
                    _ => true,
                };
                if !matches {
                    return Err(ToolError::InvalidArguments(format!(
                        "argument '{field}' must be of type {expected}, found {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The registered tool set, looked up by name at dispatch time.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

impl ToolRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Re-registering a name replaces the previous tool.
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look a tool up by name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// True if `name` is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered names, sorted for stable output.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions of every registered tool, for binding to a model request.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            self.tools.values().map(Tool::definition).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn price_tool() -> Tool {
        Tool::new(
            "get_stock_price",
            "Return the current price of a stock given the stock symbol",
            json!({
                "type": "object",
                "properties": {"symbol": {"type": "string"}},
                "required": ["symbol"]
            }),
            |args, _ctx| async move {
                let price = match args["symbol"].as_str().unwrap_or_default() {
                    "MSFT" => 200.3,
                    "AAPL" => 100.4,
                    "AMZN" => 150.0,
                    "RIL" => 87.6,
                    _ => 0.0,
                };
                Ok(json!(price))
            },
        )
    }

    fn ctx() -> ToolContext {
        ToolContext::new(NodeContext::new("tools", None, 0, vec![]), "call-1")
    }

    #[tokio::test]
    async fn executes_with_valid_args() {
        let result = price_tool()
            .execute(json!({"symbol": "MSFT"}), ctx())
            .await
            .unwrap();
        assert_eq!(result, json!(200.3));
    }

    #[tokio::test]
    async fn unknown_symbol_returns_zero() {
        let result = price_tool()
            .execute(json!({"symbol": "NOPE"}), ctx())
            .await
            .unwrap();
        assert_eq!(result, json!(0.0));
    }

    #[test]
    fn missing_required_argument_is_rejected() {
        let err = price_tool().validate_args(&json!({})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn wrong_argument_type_is_rejected() {
        let err = price_tool()
            .validate_args(&json!({"symbol": 42}))
            .unwrap_err();
        assert!(err.to_string().contains("must be of type string"));
    }

    #[test]
    fn registry_lookup_and_definitions() {
        let mut registry = ToolRegistry::new();
        registry.register(price_tool());

        assert!(registry.has_tool("get_stock_price"));
        assert!(registry.get("buy_stocks").is_none());

        let definitions = registry.definitions();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name, "get_stock_price");
        assert_eq!(definitions[0].parameters["required"][0], "symbol");
    }

    #[tokio::test]
    async fn tool_interrupt_becomes_node_interrupt() {
        let approve = Tool::new(
            "buy_stocks",
            "Buy stocks given the stock symbol and quantity",
            json!({"type": "object"}),
            |_args, ctx| async move {
                let decision = ctx.interrupt("Approve?")?;
                Ok(json!(decision))
            },
        );
        let err = approve.execute(json!({}), ctx()).await.unwrap_err();
        let node_err: NodeError = err.into();
        assert!(matches!(node_err, NodeError::Interrupt { .. }));
    }
}
