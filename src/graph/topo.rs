// src/graph/topo.rs

//! Kahn's algorithm as a lazy, single-pass iterator.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use super::dependency::DependencyGraph;
use super::error::GraphError;
use super::NodeKey;

/// Lazily produced topological order of a [`DependencyGraph`].
///
/// Each node is yielded only once all of its predecessors have been yielded.
/// Ties between ready nodes are broken FIFO: roots in graph insertion order,
/// then successors in edge insertion order.
///
/// If the queue drains while some node still has unresolved predecessors, the
/// iterator yields a single `Err(GraphError::Cycle)` and is then exhausted.
/// The order is computed from the graph state at creation time; call
/// [`DependencyGraph::topological_order`] again to restart.
#[derive(Debug)]
pub struct TopologicalOrder<'g, N: NodeKey> {
    graph: &'g DependencyGraph<N>,
    in_degree: Vec<usize>,
    queue: VecDeque<usize>,
    finished: bool,
}

impl<'g, N: NodeKey> TopologicalOrder<'g, N> {
    fn new(graph: &'g DependencyGraph<N>) -> Self {
        // Recomputed from the edge list on every call.
        let mut in_degree = vec![0usize; graph.len()];
        for &(_, to) in graph.edge_indices() {
            in_degree[to] += 1;
        }

        let queue = in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| i)
            .collect();

        Self {
            graph,
            in_degree,
            queue,
            finished: false,
        }
    }
}

impl<'g, N: NodeKey> Iterator for TopologicalOrder<'g, N> {
    type Item = Result<&'g N, GraphError<N>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(node) = self.queue.pop_front() {
            for &succ in self.graph.successor_indices(node) {
                self.in_degree[succ] -= 1;
                if self.in_degree[succ] == 0 {
                    self.queue.push_back(succ);
                }
            }
            return Some(Ok(self.graph.node_at(node)));
        }

        self.finished = true;

        let stuck: Vec<N> = self
            .in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d != 0)
            .map(|(i, _)| self.graph.node_at(i).clone())
            .collect();

        if stuck.is_empty() {
            None
        } else {
            Some(Err(GraphError::Cycle { nodes: stuck }))
        }
    }
}

impl<N: NodeKey> FusedIterator for TopologicalOrder<'_, N> {}

impl<N: NodeKey> DependencyGraph<N> {
    /// Start a fresh lazy topological traversal of the current graph.
    pub fn topological_order(&self) -> TopologicalOrder<'_, N> {
        TopologicalOrder::new(self)
    }

    /// Collect a full topological order, or fail with [`GraphError::Cycle`].
    pub fn topological_sort(&self) -> Result<Vec<N>, GraphError<N>> {
        self.topological_order()
            .map(|item| item.cloned())
            .collect()
    }
}
