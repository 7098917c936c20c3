//! Wiring of the conversation state machine:
//! `start -> router -> {order_status | product_reco | general_qa | handover} -> end`.

use crate::nodes::{
    END_NODE, EndNode, HandlerNode, ROUTER_NODE, RouterNode, START_NODE, StartNode, agent_for,
    handler_node_name,
};
use crate::router::{Intent, IntentRouter};
use halo_agent::{AgentKind, AgentPool};
use halo_graph::{Checkpointer, CompiledGraph, END, GraphState, MemoryCheckpointer, Result, START, StateGraph};
use std::sync::Arc;

/// Handler for the task the router chose. Unset or unknown tasks go to
/// the handover agent.
pub fn route_from_task(state: &GraphState) -> String {
    let intent = state.current_task.as_deref().and_then(Intent::from_label).unwrap_or(Intent::Complaint);
    handler_node_name(agent_for(intent)).to_string()
}

/// Compile the state machine with an in-memory per-session checkpointer.
pub fn build_workflow(router: Arc<IntentRouter>, pool: Arc<AgentPool>) -> Result<CompiledGraph> {
    build_workflow_with_checkpointer(router, pool, Arc::new(MemoryCheckpointer::new()))
}

pub fn build_workflow_with_checkpointer(
    router: Arc<IntentRouter>,
    pool: Arc<AgentPool>,
    checkpointer: Arc<dyn Checkpointer>,
) -> Result<CompiledGraph> {
    let handlers = AgentKind::ALL.map(handler_node_name);

    let mut graph = StateGraph::new()
        .add_node(StartNode)
        .add_node(RouterNode::new(router))
        .add_node(EndNode)
        .add_edge(START, START_NODE)
        .add_edge(START_NODE, ROUTER_NODE)
        .add_conditional_edges(ROUTER_NODE, route_from_task, handlers.map(|name| (name, name)));

    for kind in AgentKind::ALL {
        graph = graph
            .add_node(HandlerNode::new(kind, pool.clone()))
            .add_edge(handler_node_name(kind), END_NODE);
    }

    Ok(graph.add_edge(END_NODE, END).compile()?.with_checkpointer_arc(checkpointer))
}
