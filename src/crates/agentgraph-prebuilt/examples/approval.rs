//! Human-in-the-loop: a purchase tool that pauses for approval.
//!
//! The first invocation suspends with an approval prompt; resuming with
//! "yes" completes the purchase. Resuming with anything else declines it.

use agentgraph_core::{
    InMemoryCheckpointStore, Message, RunConfig, ScriptedModel, Tool, ToolCall, ToolRegistry,
};
use agentgraph_prebuilt::{create_chat_agent, ChatAgentConfig};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut tools = ToolRegistry::new();
    tools.register(Tool::new(
        "buy_stocks",
        "Buy stocks given the stock symbol and quantity",
        json!({
            "type": "object",
            "properties": {
                "symbol": {"type": "string"},
                "quantity": {"type": "integer"},
                "total_price": {"type": "number"}
            },
            "required": ["symbol", "quantity", "total_price"]
        }),
        |args, ctx| async move {
            let symbol = args["symbol"].as_str().unwrap_or_default().to_string();
            let quantity = args["quantity"].as_i64().unwrap_or(0);
            let total_price = args["total_price"].as_f64().unwrap_or(0.0);

            let decision = ctx.interrupt(format!(
                "Approve buying {quantity} {symbol} stocks for ${total_price:.2}?"
            ))?;

            if decision == "yes" {
                Ok(json!(format!(
                    "You bought {quantity} shares of {symbol} for a total price of {total_price}"
                )))
            } else {
                Ok(json!("Buying declined."))
            }
        },
    ));

    let model = Arc::new(
        ScriptedModel::new()
            .with_response(Message::assistant("").with_tool_calls(vec![ToolCall::new(
                "buy-1",
                "buy_stocks",
                json!({"symbol": "MSFT", "quantity": 10, "total_price": 2003.0}),
            )]))
            .with_response(Message::assistant("All done - 10 MSFT shares are yours.")),
    );

    let agent = create_chat_agent(
        model,
        tools,
        ChatAgentConfig::default().with_checkpointer(Arc::new(InMemoryCheckpointStore::new())),
    )?;

    let outcome = agent
        .invoke_with_config(
            json!({"messages": [Message::user("Buy 10 MSFT stocks at current price.")]}),
            RunConfig::thread("buy-thread"),
        )
        .await?;

    let pending = outcome.interrupt().expect("the purchase needs approval");
    println!("Agent asks: {}", pending.payload.as_str().unwrap());

    // A real application would collect this from a person.
    let decision = "yes";
    println!("Human answers: {decision}");

    let state = agent
        .resume("buy-thread", json!(decision))
        .await?
        .into_state()
        .expect("resume runs to completion");

    let messages = state["messages"].as_array().unwrap();
    println!(
        "Agent: {}",
        messages.last().unwrap()["content"].as_str().unwrap()
    );

    Ok(())
}
