//! Integration tests for the run loop: ordering, routing, merging,
//! checkpointing and error propagation.

use agentgraph_core::{
    GraphError, InMemoryCheckpointStore, MergePolicy, NodeError, RunConfig, StateGraph,
    StateSchema, END, START,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn approx(value: &Value, expected: f64) -> bool {
    value.as_f64().map(|v| (v - expected).abs() < 1e-6).unwrap_or(false)
}

fn traced_schema() -> StateSchema {
    StateSchema::new().field("trace", MergePolicy::Append)
}

/// Node that appends its own name to the trace.
fn tracer(graph: &mut StateGraph, name: &'static str) {
    graph.add_node(name, move |_ctx, _state| async move {
        Ok(json!({"trace": [name]}))
    });
}

#[tokio::test]
async fn linear_chain_visits_nodes_in_declared_order() {
    let mut graph = StateGraph::with_schema(traced_schema());
    tracer(&mut graph, "first");
    tracer(&mut graph, "second");
    tracer(&mut graph, "third");
    graph.add_edge(START, "first");
    graph.add_edge("first", "second");
    graph.add_edge("second", "third");
    graph.add_edge("third", END);

    let state = graph
        .compile()
        .unwrap()
        .invoke(json!({}))
        .await
        .unwrap()
        .into_state()
        .unwrap();

    assert_eq!(state["trace"], json!(["first", "second", "third"]));
}

#[tokio::test]
async fn currency_pipeline_computes_growth_then_inr() {
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

    let state = graph
        .compile()
        .unwrap()
        .invoke(json!({"amount_usd": 100000.0}))
        .await
        .unwrap()
        .into_state()
        .unwrap();

    assert!(approx(&state["total_usd"], 108_000.0));
    assert!(approx(&state["total_inr"], 9_180_000.0));
}

fn conversion_graph() -> StateGraph {
    let mut graph = StateGraph::with_schema(
        StateSchema::new()
            .field("amount_usd", MergePolicy::Overwrite)
            .field("total_usd", MergePolicy::Overwrite)
            .field("target_currency", MergePolicy::Overwrite)
            .field("total", MergePolicy::Overwrite)
            .field("trace", MergePolicy::Append),
    );
    graph.add_node("calc_total", |_ctx, state| async move {
        let amount = state["amount_usd"].as_f64().unwrap_or(0.0);
        Ok(json!({"total_usd": amount * 1.08, "trace": ["calc_total"]}))
    });
    graph.add_node("convert_to_inr", |_ctx, state| async move {
        let total = state["total_usd"].as_f64().unwrap_or(0.0);
        Ok(json!({"total": total * 85.0, "trace": ["convert_to_inr"]}))
    });
    graph.add_node("convert_to_eur", |_ctx, state| async move {
        let total = state["total_usd"].as_f64().unwrap_or(0.0);
        Ok(json!({"total": total * 0.9, "trace": ["convert_to_eur"]}))
    });
    graph.add_edge(START, "calc_total");
    graph.add_conditional_edges(
        "calc_total",
        |state| state["target_currency"].as_str().unwrap_or_default().to_string(),
        [("INR", "convert_to_inr"), ("EUR", "convert_to_eur")],
    );
    graph.add_edge("convert_to_inr", END);
    graph.add_edge("convert_to_eur", END);
    graph
}

#[tokio::test]
async fn conditional_routes_to_inr() {
    let state = conversion_graph()
        .compile()
        .unwrap()
        .invoke(json!({"amount_usd": 1000.0, "target_currency": "INR"}))
        .await
        .unwrap()
        .into_state()
        .unwrap();

    assert!(approx(&state["total_usd"], 1080.0));
    assert!(approx(&state["total"], 91_800.0));
    assert_eq!(state["trace"], json!(["calc_total", "convert_to_inr"]));
}

#[tokio::test]
async fn conditional_routes_to_eur_without_touching_inr() {
    let state = conversion_graph()
        .compile()
        .unwrap()
        .invoke(json!({"amount_usd": 1000.0, "target_currency": "EUR"}))
        .await
        .unwrap()
        .into_state()
        .unwrap();

    assert!(approx(&state["total"], 972.0));
    assert_eq!(state["trace"], json!(["calc_total", "convert_to_eur"]));
}

#[tokio::test]
async fn router_key_missing_from_table_is_a_configuration_error() {
    let err = conversion_graph()
        .compile()
        .unwrap()
        .invoke(json!({"amount_usd": 1000.0, "target_currency": "GBP"}))
        .await
        .unwrap_err();

    match err {
        GraphError::Configuration(message) => {
            assert!(message.contains("'GBP'"), "unexpected message: {message}")
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[tokio::test]
async fn two_appending_nodes_keep_both_messages_in_order() {
    let mut graph = StateGraph::with_schema(traced_schema());
    tracer(&mut graph, "a");
    tracer(&mut graph, "b");
    graph.add_edge(START, "a");
    graph.add_edge("a", "b");
    graph.add_edge("b", END);

    let state = graph
        .compile()
        .unwrap()
        .invoke(json!({"trace": ["seed"]}))
        .await
        .unwrap()
        .into_state()
        .unwrap();

    // initial length + 2, nothing dropped or reordered
    assert_eq!(state["trace"], json!(["seed", "a", "b"]));
}

#[tokio::test]
async fn partial_update_omitting_overwrite_field_leaves_it_alone() {
    let mut graph = StateGraph::with_schema(
        StateSchema::new()
            .field("kept", MergePolicy::Overwrite)
            .field("touched", MergePolicy::Overwrite),
    );
    graph.add_node("only_touches_one", |_ctx, _state| async move {
        Ok(json!({"touched": true}))
    });
    graph.add_edge(START, "only_touches_one");
    graph.add_edge("only_touches_one", END);

    let state = graph
        .compile()
        .unwrap()
        .invoke(json!({"kept": "original", "touched": false}))
        .await
        .unwrap()
        .into_state()
        .unwrap();

    assert_eq!(state["kept"], "original");
    assert_eq!(state["touched"], true);
}

#[tokio::test]
async fn undeclared_field_from_node_is_a_state_invariant_error() {
    let mut graph = StateGraph::with_schema(traced_schema());
    graph.add_node("rogue", |_ctx, _state| async move {
        Ok(json!({"undeclared": 1}))
    });
    graph.add_edge(START, "rogue");
    graph.add_edge("rogue", END);

    let err = graph.compile().unwrap().invoke(json!({})).await.unwrap_err();
    assert!(matches!(err, GraphError::StateInvariant(_)));
}

#[tokio::test]
async fn recursion_limit_stops_a_cyclic_graph() {
    let mut graph = StateGraph::with_schema(traced_schema());
    tracer(&mut graph, "spin");
    graph.add_edge(START, "spin");
    graph.add_edge("spin", "spin");

    let err = graph
        .compile()
        .unwrap()
        .invoke_with_config(json!({}), RunConfig::default().with_recursion_limit(5))
        .await
        .unwrap_err();

    match err {
        GraphError::Execution(message) => assert!(message.contains("recursion limit")),
        other => panic!("expected execution error, got {other:?}"),
    }
}

#[tokio::test]
async fn collaborator_error_keeps_prior_checkpoint_and_retry_succeeds() {
    let store = Arc::new(InMemoryCheckpointStore::new());
    let fail_once = Arc::new(AtomicBool::new(true));

    let mut graph = StateGraph::with_schema(traced_schema());
    tracer(&mut graph, "stable");
    let flag = fail_once.clone();
    graph.add_node("flaky", move |_ctx, _state| {
        let flag = flag.clone();
        async move {
            if flag.swap(false, Ordering::SeqCst) {
                Err(NodeError::Collaborator("model unreachable".to_string()))
            } else {
                Ok(json!({"trace": ["flaky"]}))
            }
        }
    });
    graph.add_edge(START, "stable");
    graph.add_edge("stable", "flaky");
    graph.add_edge("flaky", END);

    let compiled = graph.compile_with_checkpointer(store.clone()).unwrap();
    let config = RunConfig::thread("retry-thread");

    let err = compiled
        .invoke_with_config(json!({"trace": ["input"]}), config.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Collaborator { ref node, .. } if node == "flaky"));

    // The checkpoint before the failed step is intact.
    let snapshot = compiled.get_state("retry-thread").await.unwrap().unwrap();
    assert_eq!(snapshot["trace"], json!(["input", "stable"]));

    // Re-invoking with the same input retries from the failed step: the
    // completed node does not re-run and the input is not merged twice.
    let state = compiled
        .invoke_with_config(json!({"trace": ["input"]}), config)
        .await
        .unwrap()
        .into_state()
        .unwrap();
    assert_eq!(state["trace"], json!(["input", "stable", "flaky"]));
}

#[tokio::test]
async fn finished_thread_accumulates_across_invocations() {
    let store = Arc::new(InMemoryCheckpointStore::new());
    let mut graph = StateGraph::with_schema(traced_schema());
    tracer(&mut graph, "turn");
    graph.add_edge(START, "turn");
    graph.add_edge("turn", END);

    let compiled = graph.compile_with_checkpointer(store).unwrap();
    let config = RunConfig::thread("conversation");

    compiled
        .invoke_with_config(json!({"trace": ["one"]}), config.clone())
        .await
        .unwrap();
    let state = compiled
        .invoke_with_config(json!({"trace": ["two"]}), config)
        .await
        .unwrap()
        .into_state()
        .unwrap();

    assert_eq!(state["trace"], json!(["one", "turn", "two", "turn"]));
}

#[tokio::test]
async fn distinct_threads_do_not_share_state() {
    let store = Arc::new(InMemoryCheckpointStore::new());
    let mut graph = StateGraph::with_schema(traced_schema());
    tracer(&mut graph, "visit");
    graph.add_edge(START, "visit");
    graph.add_edge("visit", END);

    let compiled = graph.compile_with_checkpointer(store).unwrap();

    compiled
        .invoke_with_config(json!({"trace": ["alice"]}), RunConfig::thread("alice"))
        .await
        .unwrap();
    let bob = compiled
        .invoke_with_config(json!({"trace": ["bob"]}), RunConfig::thread("bob"))
        .await
        .unwrap()
        .into_state()
        .unwrap();

    assert_eq!(bob["trace"], json!(["bob", "visit"]));
    let alice = compiled.get_state("alice").await.unwrap().unwrap();
    assert_eq!(alice["trace"], json!(["alice", "visit"]));
}

#[tokio::test]
async fn update_state_patches_through_the_schema() {
    let store = Arc::new(InMemoryCheckpointStore::new());
    let mut graph = StateGraph::with_schema(traced_schema());
    tracer(&mut graph, "visit");
    graph.add_edge(START, "visit");
    graph.add_edge("visit", END);

    let compiled = graph.compile_with_checkpointer(store).unwrap();
    compiled
        .invoke_with_config(json!({}), RunConfig::thread("patched"))
        .await
        .unwrap();

    compiled
        .update_state("patched", json!({"trace": ["manual"]}))
        .await
        .unwrap();

    let state = compiled.get_state("patched").await.unwrap().unwrap();
    assert_eq!(state["trace"], json!(["visit", "manual"]));
}

#[tokio::test]
async fn get_state_for_unknown_thread_is_none() {
    let store = Arc::new(InMemoryCheckpointStore::new());
    let mut graph = StateGraph::with_schema(traced_schema());
    tracer(&mut graph, "visit");
    graph.add_edge(START, "visit");
    graph.add_edge("visit", END);

    let compiled = graph.compile_with_checkpointer(store).unwrap();
    assert!(compiled.get_state("never-ran").await.unwrap().is_none());
}
