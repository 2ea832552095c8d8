// src/runner/report.rs

use std::time::Duration;

use serde_json::Value;

use crate::graph::NodeKey;

/// Outcome of one successfully executed node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResult<N: NodeKey> {
    pub node: N,
    pub output: Value,
    /// Standard output captured by the strategy (empty for in-process ones).
    pub stdout: String,
    pub duration: Duration,
}

/// Results of a successful run, in topological order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport<N: NodeKey> {
    pub results: Vec<NodeResult<N>>,
}

impl<N: NodeKey> RunReport<N> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Output values in report order.
    pub fn outputs(&self) -> Vec<Value> {
        self.results.iter().map(|r| r.output.clone()).collect()
    }

    /// Node identities in report order.
    pub fn order(&self) -> Vec<N> {
        self.results.iter().map(|r| r.node.clone()).collect()
    }

    pub fn get(&self, node: &N) -> Option<&NodeResult<N>> {
        self.results.iter().find(|r| &r.node == node)
    }

    pub fn into_results(self) -> Vec<NodeResult<N>> {
        self.results
    }
}
