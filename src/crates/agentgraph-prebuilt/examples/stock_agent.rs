//! Tool-calling agent: the model looks stock prices up before answering.
//!
//! The scripted model mimics the usual flow - request two price lookups,
//! then answer from the results.

use agentgraph_core::{Message, ScriptedModel, Tool, ToolCall, ToolRegistry};
use agentgraph_prebuilt::{create_chat_agent, ChatAgentConfig};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut tools = ToolRegistry::new();
    tools.register(Tool::new(
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
    ));

    let model = Arc::new(
        ScriptedModel::new()
            .with_response(Message::assistant("").with_tool_calls(vec![
                ToolCall::new("c-amzn", "get_stock_price", json!({"symbol": "AMZN"})),
                ToolCall::new("c-msft", "get_stock_price", json!({"symbol": "MSFT"})),
            ]))
            .with_response(Message::assistant(
                "20 AMZN stocks cost $3000.00 and 15 MSFT stocks cost $3004.50, \
                 for a total of $6004.50.",
            )),
    );

    let agent = create_chat_agent(model, tools, ChatAgentConfig::default())?;
    println!("{}", agent.mermaid());

    let state = agent
        .invoke(json!({"messages": [Message::user(
            "I want to buy 20 AMZN stocks using current price. Then 15 MSFT. \
             What will be the total cost?"
        )]}))
        .await?
        .into_state()
        .expect("script never suspends");

    for message in state["messages"].as_array().unwrap() {
        let role = message["role"].as_str().unwrap();
        let content = message["content"].as_str().unwrap_or("<tool calls>");
        println!("[{role}] {content}");
    }

    Ok(())
}
