//! Minimal chatbot: one model node, message history accumulated on a
//! thread. Runs against the scripted model so it works offline; swap in a
//! real `ChatModel` implementation for live conversations.

use agentgraph_core::{InMemoryCheckpointStore, Message, RunConfig, ScriptedModel, ToolRegistry};
use agentgraph_prebuilt::{create_chat_agent, ChatAgentConfig};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let model = Arc::new(
        ScriptedModel::new()
            .with_response(Message::assistant("Hello! How can I help you today?"))
            .with_response(Message::assistant("Neil Armstrong")),
    );

    let agent = create_chat_agent(
        model,
        ToolRegistry::new(),
        ChatAgentConfig::default().with_checkpointer(Arc::new(InMemoryCheckpointStore::new())),
    )?;

    let config = RunConfig::thread("demo-chat");
    for prompt in [
        "Hello, how are you?",
        "Who walked on the moon for the first time? Print only the name",
    ] {
        println!("You: {prompt}");
        let state = agent
            .invoke_with_config(
                json!({"messages": [Message::user(prompt)]}),
                config.clone(),
            )
            .await?
            .into_state()
            .expect("no tools, no interrupts");
        let messages = state["messages"].as_array().unwrap();
        println!("Bot: {}", messages.last().unwrap()["content"].as_str().unwrap());
    }

    Ok(())
}
