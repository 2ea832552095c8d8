// src/graph/dependency.rs

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::error::GraphError;
use super::NodeKey;

/// In-memory DAG of node identities.
///
/// Nodes are kept in insertion order and addressed internally by their
/// position. An edge `from -> to` means `to` depends on `from` completing
/// first. Successor lists preserve edge insertion order, which is what makes
/// [`topological_order`](DependencyGraph::topological_order) deterministic.
///
/// Duplicate edges are recorded once. In-degrees are never stored; they are
/// derived from the edge lists whenever they are needed.
#[derive(Debug, Clone)]
pub struct DependencyGraph<N: NodeKey> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
    edge_set: HashSet<(usize, usize)>,
}

impl<N: NodeKey> Default for DependencyGraph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
            edges: Vec::new(),
            edge_set: HashSet::new(),
        }
    }
}

impl<N: NodeKey> DependencyGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Fails if the identity is already present.
    pub fn add_node(&mut self, id: N) -> Result<(), GraphError<N>> {
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.intern(id);
        Ok(())
    }

    /// Add an edge between two previously registered nodes.
    ///
    /// Both endpoints must have been added with [`add_node`](Self::add_node).
    pub fn add_edge(&mut self, from: N, to: N) -> Result<(), GraphError<N>> {
        let missing = if !self.index.contains_key(&from) {
            Some(from.clone())
        } else if !self.index.contains_key(&to) {
            Some(to.clone())
        } else {
            None
        };

        if let Some(missing) = missing {
            return Err(GraphError::UnknownNode { from, to, missing });
        }

        let a = self.index[&from];
        let b = self.index[&to];
        self.link(a, b);
        Ok(())
    }

    /// Add an edge, creating either endpoint if it does not exist yet.
    ///
    /// New endpoints are appended in the order `from`, then `to`.
    pub fn insert_edge(&mut self, from: N, to: N) {
        let a = self.intern(from);
        let b = self.intern(to);
        self.link(a, b);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &N) -> bool {
        self.index.contains_key(id)
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, from: &N, to: &N) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => self.edge_set.contains(&(a, b)),
            _ => false,
        }
    }

    /// All node identities in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N)> {
        self.edges
            .iter()
            .map(|&(a, b)| (&self.nodes[a], &self.nodes[b]))
    }

    /// Direct successors (dependents) of `id`, in edge insertion order.
    ///
    /// Unknown identities have no successors.
    pub fn successors_of<'a>(&'a self, id: &N) -> impl Iterator<Item = &'a N> + use<'a, N> {
        self.index
            .get(id)
            .into_iter()
            .flat_map(move |&i| self.successors[i].iter().map(move |&j| &self.nodes[j]))
    }

    /// Direct predecessors (dependencies) of `id`, in edge insertion order.
    pub fn predecessors_of<'a>(&'a self, id: &N) -> impl Iterator<Item = &'a N> + use<'a, N> {
        self.index
            .get(id)
            .into_iter()
            .flat_map(move |&i| self.predecessors[i].iter().map(move |&j| &self.nodes[j]))
    }

    /// Number of distinct incoming edges, or `None` for an unknown node.
    pub fn in_degree(&self, id: &N) -> Option<usize> {
        self.index.get(id).map(|&i| self.predecessors[i].len())
    }

    /// Nodes without predecessors, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &N> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| self.predecessors[*i].is_empty())
            .map(|(_, n)| n)
    }

    pub(crate) fn index_of(&self, id: &N) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn node_at(&self, i: usize) -> &N {
        &self.nodes[i]
    }

    pub(crate) fn successor_indices(&self, i: usize) -> &[usize] {
        &self.successors[i]
    }

    pub(crate) fn predecessor_indices(&self, i: usize) -> &[usize] {
        &self.predecessors[i]
    }

    pub(crate) fn edge_indices(&self) -> &[(usize, usize)] {
        &self.edges
    }

    fn intern(&mut self, id: N) -> usize {
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.nodes.len();
        trace!(node = %id, "graph: adding node");
        self.index.insert(id.clone(), i);
        self.nodes.push(id);
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        i
    }

    fn link(&mut self, from: usize, to: usize) {
        if !self.edge_set.insert((from, to)) {
            return;
        }
        trace!(
            from = %self.nodes[from],
            to = %self.nodes[to],
            "graph: adding edge"
        );
        self.edges.push((from, to));
        self.successors[from].push(to);
        self.predecessors[to].push(from);
    }
}
