use std::collections::HashMap;

use dagflow::DependencyGraph;
use petgraph::algo::is_cyclic_directed;
use proptest::prelude::*;

// Arbitrary directed graphs (cycles and self-loops allowed) over up to 8 nodes.
fn edges_strategy() -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    (1u32..=8).prop_flat_map(|n| {
        let edge = (0..n, 0..n);
        (Just(n), proptest::collection::vec(edge, 0..20))
    })
}

// Graphs that are acyclic by construction: an edge always points from a
// lower to a higher index.
fn dag_strategy() -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    edges_strategy().prop_map(|(n, edges)| {
        let edges = edges
            .into_iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        (n, edges)
    })
}

fn build(n: u32, edges: &[(u32, u32)]) -> DependencyGraph<u32> {
    let mut graph = DependencyGraph::new();
    for id in 0..n {
        graph.add_node(id).unwrap();
    }
    for &(a, b) in edges {
        graph.add_edge(a, b).unwrap();
    }
    graph
}

proptest! {
    #[test]
    fn cycle_detection_matches_petgraph((n, edges) in edges_strategy()) {
        let graph = build(n, &edges);
        prop_assert_eq!(graph.has_cycle(), is_cyclic_directed(&graph.to_petgraph()));
    }

    #[test]
    fn sort_fails_exactly_when_a_cycle_exists((n, edges) in edges_strategy()) {
        let graph = build(n, &edges);
        prop_assert_eq!(graph.has_cycle(), graph.topological_sort().is_err());
    }

    #[test]
    fn sort_respects_every_edge((n, edges) in dag_strategy()) {
        let graph = build(n, &edges);
        prop_assert!(!graph.has_cycle());

        let order = graph.topological_sort().unwrap();
        prop_assert_eq!(order.len(), n as usize);

        let position: HashMap<u32, usize> =
            order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        prop_assert_eq!(position.len(), n as usize);

        for (a, b) in edges {
            prop_assert!(position[&a] < position[&b], "edge {} -> {} violated", a, b);
        }
    }

    #[test]
    fn sort_is_deterministic((n, edges) in edges_strategy()) {
        let graph = build(n, &edges);
        prop_assert_eq!(graph.topological_sort(), graph.topological_sort());
    }
}
