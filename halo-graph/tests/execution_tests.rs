//! Graph execution tests

use halo_graph::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// start -> router -> {order | qa | handover} -> end, routed on current_task.
fn routed_graph() -> CompiledGraph {
    StateGraph::new()
        .add_node_fn("start", |_ctx| async { Ok(StateUpdate::new().assistant_response("Halo!")) })
        .add_node_fn("router", |ctx| async move {
            let task = if ctx.state.user_query.contains("order") {
                "Order_Status"
            } else if ctx.state.user_query.contains('?') {
                "General_Inquiry"
            } else {
                "Complaint"
            };
            Ok(StateUpdate::new().current_task(task))
        })
        .add_node_fn("order", |_ctx| async { Ok(StateUpdate::new().assistant_response("order reply")) })
        .add_node_fn("qa", |_ctx| async { Ok(StateUpdate::new().assistant_response("qa reply")) })
        .add_node_fn("handover", |_ctx| async {
            Ok(StateUpdate::new().assistant_response("handover reply").handoff_to_human(true))
        })
        .add_node_fn("end", |ctx| async move {
            if ctx.state.response().is_some() {
                Ok(StateUpdate::new())
            } else {
                Ok(StateUpdate::new().assistant_response("closing"))
            }
        })
        .add_edge(START, "start")
        .add_edge("start", "router")
        .add_conditional_edges(
            "router",
            |state: &GraphState| state.current_task.clone().unwrap_or_else(|| "Complaint".into()),
            [("Order_Status", "order"), ("General_Inquiry", "qa"), ("Complaint", "handover")],
        )
        .add_edge("order", "end")
        .add_edge("qa", "end")
        .add_edge("handover", "end")
        .add_edge("end", END)
        .compile()
        .unwrap()
}

fn input(query: &str) -> GraphState {
    GraphState::new("web:1", "web").with_user_query(query)
}

#[tokio::test]
async fn routes_to_the_matching_handler() {
    let graph = routed_graph();

    let state = graph.invoke(input("where is my order"), ExecutionConfig::new("web:1")).await.unwrap();
    assert_eq!(state.current_task.as_deref(), Some("Order_Status"));
    assert_eq!(state.assistant_response.as_deref(), Some("order reply"));
    assert!(!state.handoff_to_human);

    let state = graph.invoke(input("jam buka?"), ExecutionConfig::new("web:1")).await.unwrap();
    assert_eq!(state.assistant_response.as_deref(), Some("qa reply"));

    let state = graph.invoke(input("!!!"), ExecutionConfig::new("web:1")).await.unwrap();
    assert_eq!(state.current_task.as_deref(), Some("Complaint"));
    assert!(state.handoff_to_human);
}

#[tokio::test]
async fn input_fields_are_threaded_through() {
    let graph = routed_graph();
    let mut initial = input("order 12345");
    initial.locale = Some("id".into());
    initial.sentiment_score = 0.4;

    let state = graph.invoke(initial, ExecutionConfig::new("web:1")).await.unwrap();
    assert_eq!(state.session_id, "web:1");
    assert_eq!(state.locale.as_deref(), Some("id"));
    assert_eq!(state.sentiment_score, 0.4);
    assert_eq!(state.user_query, "order 12345");
}

#[tokio::test]
async fn checkpoints_record_each_step_per_thread() {
    let graph = routed_graph().with_checkpointer(MemoryCheckpointer::new());

    graph.invoke(input("order 1"), ExecutionConfig::new("web:1")).await.unwrap();
    graph.invoke(input("jam buka?"), ExecutionConfig::new("tg:2")).await.unwrap();

    let history = graph.get_state_history("web:1").await.unwrap();
    let nodes: Vec<&str> = history.iter().map(|c| c.executed_nodes[0].as_str()).collect();
    assert_eq!(nodes, ["start", "router", "order", "end"]);
    assert_eq!(history.iter().map(|c| c.step).collect::<Vec<_>>(), [0, 1, 2, 3]);

    let last = graph.get_state("tg:2").await.unwrap().unwrap();
    assert_eq!(last.assistant_response.as_deref(), Some("qa reply"));
    assert!(graph.get_state("unknown").await.unwrap().is_none());
}

#[tokio::test]
async fn earlier_turns_are_not_restored() {
    let graph = routed_graph().with_checkpointer(MemoryCheckpointer::new());

    let first = graph.invoke(input("!!!"), ExecutionConfig::new("web:1")).await.unwrap();
    assert!(first.handoff_to_human);

    let second = graph.invoke(input("order 9"), ExecutionConfig::new("web:1")).await.unwrap();
    assert!(!second.handoff_to_human);
    assert_eq!(second.current_task.as_deref(), Some("Order_Status"));
}

#[tokio::test]
async fn without_checkpointer_state_is_not_kept() {
    let graph = routed_graph();
    graph.invoke(input("order 1"), ExecutionConfig::new("web:1")).await.unwrap();
    assert!(graph.get_state("web:1").await.unwrap().is_none());
}

#[tokio::test]
async fn recursion_limit_stops_cycles() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let graph = StateGraph::new()
        .add_node_fn("loop", move |_ctx| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(StateUpdate::new())
            }
        })
        .add_edge(START, "loop")
        .add_edge("loop", "loop")
        .compile()
        .unwrap();

    let err = graph
        .invoke(GraphState::default(), ExecutionConfig::new("t").with_recursion_limit(5))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::RecursionLimitExceeded(5)));
    assert_eq!(runs.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn handler_failure_aborts_the_run() {
    let graph = StateGraph::new()
        .add_node_fn("router", |_ctx| async {
            Err(GraphError::Halo(halo_core::HaloError::Session("db down".into())))
        })
        .add_edge(START, "router")
        .compile()
        .unwrap();

    let err = graph.invoke(GraphState::default(), ExecutionConfig::new("t")).await.unwrap_err();
    assert!(matches!(err, GraphError::NodeExecutionFailed { ref node, ref message }
        if node == "router" && message.contains("db down")));
}
