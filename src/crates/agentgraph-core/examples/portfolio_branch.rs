//! Conditional routing example: convert to INR or EUR depending on the
//! requested target currency.

use agentgraph_core::{MergePolicy, StateGraph, StateSchema, END, START};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut graph = StateGraph::with_schema(
        StateSchema::new()
            .field("amount_usd", MergePolicy::Overwrite)
            .field("total_usd", MergePolicy::Overwrite)
            .field("target_currency", MergePolicy::Overwrite)
            .field("total", MergePolicy::Overwrite),
    );

    graph.add_node("calc_total", |_ctx, state| async move {
        let amount = state["amount_usd"].as_f64().unwrap_or(0.0);
        Ok(json!({"total_usd": amount * 1.08}))
    });
    graph.add_node("convert_to_inr", |_ctx, state| async move {
        let total = state["total_usd"].as_f64().unwrap_or(0.0);
        Ok(json!({"total": total * 85.0}))
    });
    graph.add_node("convert_to_eur", |_ctx, state| async move {
        let total = state["total_usd"].as_f64().unwrap_or(0.0);
        Ok(json!({"total": total * 0.9}))
    });

    graph.add_edge(START, "calc_total");
    graph.add_conditional_edges(
        "calc_total",
        |state| state["target_currency"].as_str().unwrap_or_default().to_string(),
        [("INR", "convert_to_inr"), ("EUR", "convert_to_eur")],
    );
    graph.add_edge("convert_to_inr", END);
    graph.add_edge("convert_to_eur", END);

    let compiled = graph.compile()?;
    println!("{}", compiled.mermaid());

    for currency in ["INR", "EUR"] {
        let state = compiled
            .invoke(json!({"amount_usd": 1000.0, "target_currency": currency}))
            .await?
            .into_state()
            .expect("this graph never suspends");
        println!(
            "{currency}: 1000 USD -> {:.2} after growth -> {:.2} {currency}",
            state["total_usd"].as_f64().unwrap(),
            state["total"].as_f64().unwrap(),
        );
    }

    Ok(())
}
