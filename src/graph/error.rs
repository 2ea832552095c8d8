// src/graph/error.rs

use thiserror::Error;

use super::NodeKey;

/// Errors raised while building or ordering a [`DependencyGraph`].
///
/// [`DependencyGraph`]: super::DependencyGraph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError<N: NodeKey> {
    /// `add_node` was called with an identity that is already registered.
    #[error("duplicate node: {0}")]
    DuplicateNode(N),

    /// `add_edge` referenced a node that was never added.
    #[error("edge {from} -> {to} references unknown node {missing}")]
    UnknownNode { from: N, to: N, missing: N },

    /// The graph is not acyclic.
    ///
    /// `nodes` holds the cycle path when found by DFS, or every node left
    /// with unresolved predecessors when found by the topological sort.
    #[error("cycle detected involving nodes {nodes:?}")]
    Cycle { nodes: Vec<N> },
}

impl<N: NodeKey> GraphError<N> {
    /// Duplicate identities and dangling edges.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            GraphError::DuplicateNode(_) | GraphError::UnknownNode { .. }
        )
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, GraphError::Cycle { .. })
    }
}
