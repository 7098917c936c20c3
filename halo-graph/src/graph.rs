//! StateGraph builder for constructing graphs

use crate::checkpoint::Checkpointer;
use crate::edge::{END, Edge, EdgeTarget, RouterFn, START};
use crate::error::{GraphError, Result};
use crate::node::{DEFAULT_RECURSION_LIMIT, FunctionNode, Node, NodeContext};
use crate::state::{GraphState, StateUpdate};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Builder for constructing graphs
#[derive(Default)]
pub struct StateGraph {
    /// Registered nodes
    pub nodes: HashMap<String, Arc<dyn Node>>,
    /// Registered edges
    pub edges: Vec<Edge>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph
    pub fn add_node<N: Node + 'static>(mut self, node: N) -> Self {
        self.nodes.insert(node.name().to_string(), Arc::new(node));
        self
    }

    /// Add a function as a node
    pub fn add_node_fn<F, Fut>(self, name: &str, func: F) -> Self
    where
        F: Fn(NodeContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<StateUpdate>> + Send + 'static,
    {
        self.add_node(FunctionNode::new(name, func))
    }

    /// Add a direct edge from source to target
    pub fn add_edge(mut self, source: &str, target: &str) -> Self {
        if source == START {
            self.edges.push(Edge::Entry { target: target.to_string() });
        } else {
            self.edges.push(Edge::Direct { source: source.to_string(), target: EdgeTarget::from(target) });
        }
        self
    }

    /// Add a conditional edge. `router` returns a route name that must be a
    /// key of `targets`.
    pub fn add_conditional_edges<F, I>(self, source: &str, router: F, targets: I) -> Self
    where
        F: Fn(&GraphState) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        self.add_conditional_edges_arc(source, Arc::new(router), targets)
    }

    /// Add a conditional edge with an Arc router (for pre-built routers)
    pub fn add_conditional_edges_arc<I>(mut self, source: &str, router: RouterFn, targets: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        let targets: HashMap<String, EdgeTarget> =
            targets.into_iter().map(|(k, v)| (k.to_string(), EdgeTarget::from(v))).collect();

        self.edges.push(Edge::Conditional { source: source.to_string(), router, targets });
        self
    }

    /// Compile the graph for execution
    pub fn compile(self) -> Result<CompiledGraph> {
        self.validate()?;

        Ok(CompiledGraph {
            nodes: self.nodes,
            edges: self.edges,
            checkpointer: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        })
    }

    /// Validate the graph structure
    fn validate(&self) -> Result<()> {
        let entries: Vec<&str> = self
            .edges
            .iter()
            .filter_map(|e| match e {
                Edge::Entry { target } => Some(target.as_str()),
                _ => None,
            })
            .collect();
        match entries.as_slice() {
            [] => return Err(GraphError::NoEntryPoint),
            [_] => {}
            _ => {
                return Err(GraphError::InvalidGraph(format!(
                    "multiple entry points: {}",
                    entries.join(", ")
                )));
            }
        }

        let node_exists = |name: &str| self.nodes.contains_key(name);
        let mut conditional_sources = Vec::new();

        for edge in &self.edges {
            match edge {
                Edge::Entry { target } => {
                    if target == END || !node_exists(target) {
                        return Err(GraphError::EdgeTargetNotFound(target.clone()));
                    }
                }
                Edge::Direct { source, target } => {
                    if !node_exists(source) {
                        return Err(GraphError::NodeNotFound(source.clone()));
                    }
                    if let EdgeTarget::Node(name) = target {
                        if !node_exists(name) {
                            return Err(GraphError::EdgeTargetNotFound(name.clone()));
                        }
                    }
                }
                Edge::Conditional { source, targets, .. } => {
                    if !node_exists(source) {
                        return Err(GraphError::NodeNotFound(source.clone()));
                    }
                    if targets.is_empty() {
                        return Err(GraphError::InvalidGraph(format!(
                            "conditional edge from '{source}' has no targets"
                        )));
                    }
                    for target in targets.values() {
                        if let EdgeTarget::Node(name) = target {
                            if !node_exists(name) {
                                return Err(GraphError::EdgeTargetNotFound(name.clone()));
                            }
                        }
                    }
                    conditional_sources.push(source.as_str());
                }
            }
        }

        // A conditional node decides alone where to go next.
        for source in conditional_sources {
            let outgoing = self.edges.iter().filter(|e| e.source() == source).count();
            if outgoing > 1 {
                return Err(GraphError::InvalidGraph(format!(
                    "node '{source}' mixes a conditional edge with other outgoing edges"
                )));
            }
        }

        Ok(())
    }
}

/// A compiled graph ready for execution
pub struct CompiledGraph {
    pub(crate) nodes: HashMap<String, Arc<dyn Node>>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) checkpointer: Option<Arc<dyn Checkpointer>>,
    pub(crate) recursion_limit: usize,
}

impl CompiledGraph {
    /// Configure checkpointing
    pub fn with_checkpointer<C: Checkpointer + 'static>(mut self, checkpointer: C) -> Self {
        self.checkpointer = Some(Arc::new(checkpointer));
        self
    }

    /// Configure checkpointing with Arc
    pub fn with_checkpointer_arc(mut self, checkpointer: Arc<dyn Checkpointer>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// Set the default recursion limit. A lower limit in the execution config
    /// wins.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Get the entry node
    pub fn entry_node(&self) -> Option<&str> {
        self.edges.iter().find_map(|e| match e {
            Edge::Entry { target } => Some(target.as_str()),
            _ => None,
        })
    }

    pub fn node_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get next nodes after executing the given nodes. Routes to END add
    /// nothing; an empty result means the run is over.
    pub fn get_next_nodes(&self, executed: &[String], state: &GraphState) -> Result<Vec<String>> {
        let mut next = Vec::new();

        for edge in &self.edges {
            let target = match edge {
                Edge::Direct { source, target } if executed.contains(source) => target.clone(),
                Edge::Conditional { source, router, targets } if executed.contains(source) => {
                    let route = router(state);
                    if route == END {
                        continue;
                    }
                    targets.get(&route).cloned().ok_or_else(|| GraphError::UnknownRouteTarget {
                        source_node: source.clone(),
                        route,
                    })?
                }
                _ => continue,
            };
            if let EdgeTarget::Node(n) = target {
                if !next.contains(&n) {
                    next.push(n);
                }
            }
        }

        Ok(next)
    }

    /// Get the checkpointer if configured
    pub fn checkpointer(&self) -> Option<&Arc<dyn Checkpointer>> {
        self.checkpointer.as_ref()
    }
}
