//! Span helpers for the conversation pipeline.
//!
//! ```
//! use halo_telemetry::tool_execute_span;
//! let span = tool_execute_span("extract_order_id");
//! let _enter = span.enter();
//! ```

use tracing::Span;

/// One `run_conversation` call.
pub fn conversation_turn_span(session_id: &str, channel: &str) -> Span {
    tracing::info_span!(
        "conversation.turn",
        session.id = session_id,
        channel = channel,
        current_task = tracing::field::Empty,
        handoff = tracing::field::Empty,
        otel.kind = "server"
    )
}

/// A single node execution inside the state graph.
pub fn graph_node_span(node: &str, step: usize) -> Span {
    tracing::info_span!("graph.node", node.name = node, graph.step = step, otel.kind = "internal")
}

pub fn agent_run_span(agent_name: &str) -> Span {
    tracing::info_span!(
        "agent.run",
        agent.name = agent_name,
        agent.iterations = tracing::field::Empty,
        otel.kind = "internal"
    )
}

pub fn model_call_span(model_name: &str) -> Span {
    tracing::info_span!("model.call", model.name = model_name, otel.kind = "client")
}

pub fn tool_execute_span(tool_name: &str) -> Span {
    tracing::info_span!("tool.execute", tool.name = tool_name, otel.kind = "internal")
}

/// File ingestion into a vector collection.
pub fn ingest_span(filename: &str, collection: &str) -> Span {
    tracing::info_span!(
        "rag.ingest",
        file.name = filename,
        collection = collection,
        chunks = tracing::field::Empty,
        otel.kind = "internal"
    )
}

/// Record the routing outcome on the current turn span.
pub fn record_turn_outcome(span: &Span, current_task: Option<&str>, handoff: bool) {
    span.record("current_task", current_task.unwrap_or("none"));
    span.record("handoff", handoff);
}
