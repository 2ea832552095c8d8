// src/runner/state.rs

//! Per-run bookkeeping shared by the sequential and concurrent runners.
//!
//! All state is keyed by the graph's internal node position, so lookups are
//! plain vector indexing. Nothing here outlives a single run.

use std::collections::BTreeSet;
use std::time::Duration;

use serde_json::Value;

use crate::graph::{DependencyGraph, NodeKey};
use crate::node::GraphNode;
use crate::strategy::Execution;
use crate::types::InputPolicy;

use super::report::NodeResult;

/// Outputs and results recorded so far in one run.
pub(crate) struct RunState<'g, N: NodeKey> {
    graph: &'g DependencyGraph<N>,
    policy: InputPolicy,
    outputs: Vec<Option<Value>>,
    results: Vec<Option<NodeResult<N>>>,
}

impl<'g, N: NodeKey> RunState<'g, N> {
    pub(crate) fn new(graph: &'g DependencyGraph<N>, policy: InputPolicy) -> Self {
        Self {
            graph,
            policy,
            outputs: vec![None; graph.len()],
            results: vec![None; graph.len()],
        }
    }

    /// Input to hand to the node at `idx`, according to the input policy.
    pub(crate) fn input_for(&self, idx: usize, node: &GraphNode) -> Value {
        match self.policy {
            InputPolicy::Assigned => node.input().clone(),
            InputPolicy::Chained => match self.graph.predecessor_indices(idx) {
                [] => node.input().clone(),
                [single] => self.output_of(*single),
                many => Value::Array(many.iter().map(|&p| self.output_of(p)).collect()),
            },
        }
    }

    pub(crate) fn record_success(&mut self, idx: usize, execution: Execution, duration: Duration) {
        self.outputs[idx] = Some(execution.output.clone());
        self.results[idx] = Some(NodeResult {
            node: self.graph.node_at(idx).clone(),
            output: execution.output,
            stdout: execution.stdout,
            duration,
        });
    }

    /// Drain recorded results in the given order, skipping nodes that never
    /// completed.
    pub(crate) fn take_results(&mut self, order: &[usize]) -> Vec<NodeResult<N>> {
        order
            .iter()
            .filter_map(|&idx| self.results[idx].take())
            .collect()
    }

    fn output_of(&self, idx: usize) -> Value {
        self.outputs[idx].clone().unwrap_or(Value::Null)
    }
}

/// Dependency-driven ready set for concurrent runs.
///
/// A node becomes ready once every predecessor completed successfully. Ready
/// nodes are handed out by their rank in the topological order, so the
/// earliest node in that order always starts first.
pub(crate) struct ReadySet {
    order: Vec<usize>,
    rank: Vec<usize>,
    waiting_on: Vec<usize>,
    ready: BTreeSet<usize>,
}

impl ReadySet {
    /// `order` must be a topological order of every node in `graph`.
    pub(crate) fn new<N: NodeKey>(graph: &DependencyGraph<N>, order: Vec<usize>) -> Self {
        let mut rank = vec![0; graph.len()];
        for (r, &idx) in order.iter().enumerate() {
            rank[idx] = r;
        }

        let waiting_on: Vec<usize> = (0..graph.len())
            .map(|idx| graph.predecessor_indices(idx).len())
            .collect();

        let ready = (0..graph.len())
            .filter(|&idx| waiting_on[idx] == 0)
            .map(|idx| rank[idx])
            .collect();

        Self {
            order,
            rank,
            waiting_on,
            ready,
        }
    }

    /// Next ready node, earliest in topological order first.
    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.ready.pop_first().map(|r| self.order[r])
    }

    /// Mark `idx` as done and release successors whose dependencies are now
    /// all satisfied.
    pub(crate) fn complete<N: NodeKey>(&mut self, graph: &DependencyGraph<N>, idx: usize) {
        for &succ in graph.successor_indices(idx) {
            self.waiting_on[succ] -= 1;
            if self.waiting_on[succ] == 0 {
                self.ready.insert(self.rank[succ]);
            }
        }
    }

    /// Drop every ready node; used once the run has failed.
    pub(crate) fn close(&mut self) {
        self.ready.clear();
    }

    pub(crate) fn order(&self) -> &[usize] {
        &self.order
    }
}
