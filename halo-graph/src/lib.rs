//! # halo-graph
//!
//! State-graph engine driving one conversation turn.
//!
//! ## Overview
//!
//! A graph is a set of named nodes joined by direct or conditional edges.
//! Every node reads the typed [`GraphState`] and returns a partial
//! [`StateUpdate`]. The executor runs from the entry node until no edge
//! leads anywhere else, records a checkpoint per step under the run's
//! thread id, and aborts once the recursion limit is reached.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use halo_graph::prelude::*;
//!
//! let graph = StateGraph::new()
//!     .add_node_fn("classify", |ctx| async move {
//!         Ok(StateUpdate::new().current_task("General_Inquiry"))
//!     })
//!     .add_node_fn("answer", |_ctx| async move {
//!         Ok(StateUpdate::new().assistant_response("Halo!"))
//!     })
//!     .add_edge(START, "classify")
//!     .add_conditional_edges("classify", |state: &GraphState| {
//!         state.current_task.clone().unwrap_or_else(|| "Complaint".into())
//!     }, [
//!         ("General_Inquiry", "answer"),
//!         ("Complaint", END),
//!     ])
//!     .add_edge("answer", END)
//!     .compile()?
//!     .with_checkpointer(MemoryCheckpointer::new());
//!
//! let state = graph.invoke(GraphState::new("web:1", "web"), ExecutionConfig::new("web:1")).await?;
//! ```

pub mod checkpoint;
pub mod edge;
pub mod error;
pub mod executor;
pub mod graph;
pub mod node;
pub mod state;

// Re-exports
pub use checkpoint::{Checkpointer, DEFAULT_MAX_CHECKPOINTS_PER_THREAD, MemoryCheckpointer};
pub use edge::{END, Edge, EdgeTarget, START};
pub use error::{GraphError, Result};
pub use executor::PregelExecutor;
pub use graph::{CompiledGraph, StateGraph};
pub use node::{DEFAULT_RECURSION_LIMIT, ExecutionConfig, FunctionNode, Node, NodeContext};
pub use state::{Checkpoint, GraphState, StateUpdate};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::checkpoint::{Checkpointer, MemoryCheckpointer};
    pub use crate::edge::{END, Edge, EdgeTarget, START};
    pub use crate::error::{GraphError, Result};
    pub use crate::graph::{CompiledGraph, StateGraph};
    pub use crate::node::{ExecutionConfig, FunctionNode, Node, NodeContext};
    pub use crate::state::{GraphState, StateUpdate};
}
