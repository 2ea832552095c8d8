// src/graph/mod.rs

//! Dependency graph of workflow nodes.
//!
//! - [`dependency`] holds the [`DependencyGraph`] itself: node identities in
//!   insertion order plus successor / predecessor adjacency.
//! - [`cycle`] implements three-colour DFS cycle detection.
//! - [`topo`] implements Kahn's algorithm as a lazy [`TopologicalOrder`].
//! - [`export`] converts to `petgraph` and Graphviz DOT for diagnostics.
//! - [`error`] defines [`GraphError`].

use std::fmt;
use std::hash::Hash;

pub mod cycle;
pub mod dependency;
pub mod error;
pub mod export;
pub mod topo;

pub use dependency::DependencyGraph;
pub use error::GraphError;
pub use topo::TopologicalOrder;

/// Identity of a node inside one graph.
///
/// Blanket-implemented for anything hashable, comparable, printable and
/// shareable across tasks, so `String`, `&'static str` and the integer types
/// all work as node identities.
pub trait NodeKey: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}
