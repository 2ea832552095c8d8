// src/runner/error.rs

use thiserror::Error;

use crate::graph::{GraphError, NodeKey};
use crate::strategy::ExecutionFailure;

use super::report::NodeResult;

/// Why a run did not complete.
#[derive(Debug, Error)]
pub enum RunError<N: NodeKey> {
    /// The graph is structurally invalid or cyclic; nothing was executed.
    #[error(transparent)]
    Graph(#[from] GraphError<N>),

    /// A graph node has no `GraphNode` registered for it; nothing was executed.
    #[error("node {0} has no registered implementation")]
    UnboundNode(N),

    /// A node's strategy failed. The run stopped at this node.
    ///
    /// `completed` holds the nodes that finished successfully before the run
    /// stopped, in topological order.
    #[error("node {node} failed ({}): {failure}", .failure.kind())]
    NodeFailed {
        node: N,
        #[source]
        failure: ExecutionFailure,
        completed: Vec<NodeResult<N>>,
    },
}

impl<N: NodeKey> RunError<N> {
    /// The node whose execution failed, if this is an execution failure.
    pub fn failed_node(&self) -> Option<&N> {
        match self {
            RunError::NodeFailed { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ExecutionFailure> {
        match self {
            RunError::NodeFailed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Results of nodes that completed before the failure.
    pub fn completed(&self) -> &[NodeResult<N>] {
        match self {
            RunError::NodeFailed { completed, .. } => completed,
            _ => &[],
        }
    }

    /// `true` when the run was rejected before any node executed.
    pub fn is_scheduling_error(&self) -> bool {
        !matches!(self, RunError::NodeFailed { .. })
    }
}
