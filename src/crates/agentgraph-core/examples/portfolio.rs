//! Linear pipeline example: grow a USD amount by 8%, then convert to INR.
//!
//! Demonstrates sequential execution over an overwrite-policy state.

use agentgraph_core::{MergePolicy, StateGraph, StateSchema, END, START};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut graph = StateGraph::with_schema(
        StateSchema::new()
            .field("amount_usd", MergePolicy::Overwrite)
            .field("total_usd", MergePolicy::Overwrite)
            .field("total_inr", MergePolicy::Overwrite),
    );

    graph.add_node("calc_total", |_ctx, state| async move {
        let amount = state["amount_usd"].as_f64().unwrap_or(0.0);
        Ok(json!({"total_usd": amount * 1.08}))
    });
    graph.add_node("convert_to_inr", |_ctx, state| async move {
        let total = state["total_usd"].as_f64().unwrap_or(0.0);
        Ok(json!({"total_inr": total * 85.0}))
    });

    graph.add_edge(START, "calc_total");
    graph.add_edge("calc_total", "convert_to_inr");
    graph.add_edge("convert_to_inr", END);

    let compiled = graph.compile()?;
    println!("{}", compiled.mermaid());

    let state = compiled
        .invoke(json!({"amount_usd": 100000.0}))
        .await?
        .into_state()
        .expect("this graph never suspends");

    println!("Initial USD:     ${:>14.2}", state["amount_usd"].as_f64().unwrap());
    println!("After 8% growth: ${:>14.2}", state["total_usd"].as_f64().unwrap());
    println!("Converted:       ₹{:>14.2}", state["total_inr"].as_f64().unwrap());

    Ok(())
}
