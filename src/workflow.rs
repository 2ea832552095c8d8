// src/workflow.rs

//! A dependency graph bundled with the node implementations it schedules.

use crate::graph::{DependencyGraph, GraphError, NodeKey};
use crate::node::GraphNode;
use crate::runner::{NodeRegistry, RunError, RunReport, Runner};

/// Owns a [`DependencyGraph`] and the [`GraphNode`] registered for each of
/// its identities.
///
/// Nodes are registered first, then wired with edges; both steps reject
/// structural mistakes immediately.
#[derive(Debug, Clone)]
pub struct Workflow<N: NodeKey> {
    graph: DependencyGraph<N>,
    nodes: NodeRegistry<N>,
}

impl<N: NodeKey> Default for Workflow<N> {
    fn default() -> Self {
        Self {
            graph: DependencyGraph::new(),
            nodes: NodeRegistry::new(),
        }
    }
}

impl<N: NodeKey> Workflow<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` under `id`. Fails on a duplicate identity.
    pub fn add_node(&mut self, id: N, node: GraphNode) -> Result<(), GraphError<N>> {
        self.graph.add_node(id.clone())?;
        self.nodes.insert(id, node);
        Ok(())
    }

    /// `to` runs after `from`. Both must already be registered.
    pub fn add_edge(&mut self, from: N, to: N) -> Result<(), GraphError<N>> {
        self.graph.add_edge(from, to)
    }

    /// Add an edge between each consecutive pair of `ids`, forming a linear
    /// chain.
    pub fn chain<I>(&mut self, ids: I) -> Result<(), GraphError<N>>
    where
        I: IntoIterator<Item = N>,
    {
        let mut prev: Option<N> = None;
        for id in ids {
            if let Some(from) = prev.take() {
                self.graph.add_edge(from, id.clone())?;
            }
            prev = Some(id);
        }
        Ok(())
    }

    pub fn graph(&self) -> &DependencyGraph<N> {
        &self.graph
    }

    pub fn nodes(&self) -> &NodeRegistry<N> {
        &self.nodes
    }

    pub fn node(&self, id: &N) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Execute the workflow with `runner`.
    pub async fn run(&self, runner: &Runner) -> Result<RunReport<N>, RunError<N>> {
        runner.run(&self.graph, &self.nodes).await
    }
}
