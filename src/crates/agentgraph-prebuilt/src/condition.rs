//! Routing helpers for the chatbot ⇄ tools loop.

use agentgraph_core::{last_message, messages_from_state, END};
use serde_json::Value;

/// Branch key routing into the tool-dispatch node.
pub const TOOLS: &str = "tools";

/// Router for the standard tool loop: if the last message carries
/// outstanding tool calls, route to the `"tools"` branch; otherwise the
/// conversation is done and control flows to END.
///
/// Total over reachable states - malformed or empty histories route to END
/// rather than panicking; a missing branch is then caught as a
/// configuration error by the executor.
pub fn tools_condition(state: &Value) -> String {
    let has_calls = messages_from_state(state)
        .ok()
        .as_deref()
        .and_then(last_message)
        .map(|message| message.has_tool_calls())
        .unwrap_or(false);
    if has_calls {
        TOOLS.to_string()
    } else {
        END.to_string()
    }
}
