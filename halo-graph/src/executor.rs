//! Step-based execution engine for graphs
//!
//! Each step runs the pending nodes, merges their updates, records a
//! checkpoint and follows the outgoing edges.

use crate::error::{GraphError, Result};
use crate::graph::CompiledGraph;
use crate::node::{ExecutionConfig, NodeContext};
use crate::state::{Checkpoint, GraphState};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{Instrument, debug};

/// Result of a super-step execution
#[derive(Debug, Default)]
pub struct SuperStepResult {
    /// Nodes that were executed
    pub executed_nodes: Vec<String>,
}

/// Executor for one run of a compiled graph
pub struct PregelExecutor<'a> {
    graph: &'a CompiledGraph,
    config: ExecutionConfig,
    state: GraphState,
    step: usize,
    pending_nodes: Vec<String>,
}

impl<'a> PregelExecutor<'a> {
    /// Create a new executor
    pub fn new(graph: &'a CompiledGraph, config: ExecutionConfig) -> Self {
        Self { graph, config, state: GraphState::default(), step: 0, pending_nodes: vec![] }
    }

    /// Run the graph to completion. The input is the whole initial state;
    /// earlier checkpoints of the thread are never loaded.
    pub async fn run(&mut self, input: GraphState) -> Result<GraphState> {
        self.state = input;
        self.pending_nodes = self.graph.entry_node().map(str::to_string).into_iter().collect();
        let limit = self.config.recursion_limit.min(self.graph.recursion_limit);

        while !self.pending_nodes.is_empty() {
            if self.step >= limit {
                return Err(GraphError::RecursionLimitExceeded(self.step));
            }

            let result = self.execute_super_step().await?;
            self.save_checkpoint(&result.executed_nodes).await?;

            self.pending_nodes = self.graph.get_next_nodes(&result.executed_nodes, &self.state)?;
            self.step += 1;
        }

        debug!(thread_id = %self.config.thread_id, steps = self.step, "graph run complete");
        Ok(std::mem::take(&mut self.state))
    }

    /// Execute one super-step (plan -> execute -> update)
    async fn execute_super_step(&mut self) -> Result<SuperStepResult> {
        let nodes: Vec<_> = self
            .pending_nodes
            .iter()
            .map(|name| {
                self.graph
                    .nodes
                    .get(name)
                    .map(|n| (name.clone(), n.clone()))
                    .ok_or_else(|| GraphError::NodeNotFound(name.clone()))
            })
            .collect::<Result<_>>()?;

        let futures: Vec<_> = nodes
            .into_iter()
            .map(|(name, node)| {
                let ctx = NodeContext::new(self.state.clone(), self.config.clone(), self.step);
                let span = halo_telemetry::graph_node_span(&name, self.step);
                async move {
                    let start = Instant::now();
                    let output = node.execute(&ctx).await;
                    debug!(node = %name, duration_ms = start.elapsed().as_millis() as u64, "node finished");
                    (name, output)
                }
                .instrument(span)
            })
            .collect();

        let concurrency = self.pending_nodes.len().max(1);
        let mut outputs: Vec<_> = stream::iter(futures).buffer_unordered(concurrency).collect().await;
        // Deterministic merge order when several nodes run in one step.
        outputs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut result = SuperStepResult::default();
        let mut updates = Vec::with_capacity(outputs.len());
        for (node_name, output) in outputs {
            match output {
                Ok(update) => updates.push(update),
                Err(e) => {
                    return Err(GraphError::NodeExecutionFailed { node: node_name, message: e.to_string() });
                }
            }
            result.executed_nodes.push(node_name);
        }

        for update in updates {
            self.state.apply(update);
        }

        Ok(result)
    }

    async fn save_checkpoint(&self, executed_nodes: &[String]) -> Result<()> {
        if let Some(cp) = &self.graph.checkpointer {
            let checkpoint = Checkpoint::new(
                &self.config.thread_id,
                self.state.clone(),
                self.step,
                executed_nodes.to_vec(),
            );
            cp.save(&checkpoint).await?;
        }
        Ok(())
    }
}

/// Convenience methods for CompiledGraph
impl CompiledGraph {
    /// Run the graph on `input` under the thread of `config`.
    pub async fn invoke(&self, input: GraphState, config: ExecutionConfig) -> Result<GraphState> {
        let mut executor = PregelExecutor::new(self, config);
        executor.run(input).await
    }

    /// State after the last step recorded for a thread
    pub async fn get_state(&self, thread_id: &str) -> Result<Option<GraphState>> {
        if let Some(cp) = &self.checkpointer {
            Ok(cp.load(thread_id).await?.map(|c| c.state))
        } else {
            Ok(None)
        }
    }

    /// Every recorded checkpoint of a thread, oldest first
    pub async fn get_state_history(&self, thread_id: &str) -> Result<Vec<Checkpoint>> {
        match &self.checkpointer {
            Some(cp) => cp.list(thread_id).await,
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{END, START};
    use crate::graph::StateGraph;
    use crate::state::StateUpdate;

    #[tokio::test]
    async fn test_linear_run() {
        let graph = StateGraph::new()
            .add_node_fn("a", |_ctx| async { Ok(StateUpdate::new().assistant_response("a")) })
            .add_node_fn("b", |ctx| async move {
                let prev = ctx.state.assistant_response.unwrap_or_default();
                Ok(StateUpdate::new().assistant_response(format!("{prev}b")))
            })
            .add_edge(START, "a")
            .add_edge("a", "b")
            .add_edge("b", END)
            .compile()
            .unwrap();

        let result = graph.invoke(GraphState::default(), ExecutionConfig::new("t")).await.unwrap();
        assert_eq!(result.assistant_response.as_deref(), Some("ab"));
    }

    #[tokio::test]
    async fn test_node_error_is_wrapped() {
        let graph = StateGraph::new()
            .add_node_fn("boom", |_ctx| async {
                Err(GraphError::Halo(halo_core::HaloError::Model("down".into())))
            })
            .add_edge(START, "boom")
            .compile()
            .unwrap();

        let err = graph.invoke(GraphState::default(), ExecutionConfig::new("t")).await.unwrap_err();
        assert!(matches!(err, GraphError::NodeExecutionFailed { node, .. } if node == "boom"));
    }
}
