// src/graph/export.rs

//! Conversions used for diagnostics (`dagflow --dot`) and cross-checking.

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

use super::dependency::DependencyGraph;
use super::NodeKey;

impl<N: NodeKey> DependencyGraph<N> {
    /// Build an equivalent `petgraph` graph.
    ///
    /// Node indices follow insertion order, edges follow edge insertion order.
    pub fn to_petgraph(&self) -> DiGraph<N, ()> {
        let mut graph = DiGraph::with_capacity(self.len(), self.edge_count());

        let indices: Vec<NodeIndex> = self
            .nodes()
            .map(|node| graph.add_node(node.clone()))
            .collect();

        for &(from, to) in self.edge_indices() {
            graph.add_edge(indices[from], indices[to], ());
        }

        graph
    }

    /// Render the graph as Graphviz DOT, labelling nodes with their identity.
    pub fn to_dot(&self) -> String {
        let labelled = self
            .to_petgraph()
            .map(|_, node| node.to_string(), |_, _| String::new());

        format!("{}", Dot::with_config(&labelled, &[Config::EdgeNoLabel]))
    }
}
