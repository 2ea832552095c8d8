// tests/graph_topological.rs

use dagflow::{DependencyGraph, GraphError};
use dagflow_test_utils::builders::graph_from_edges;

fn sorted(edges: &[(&str, &str)]) -> Vec<String> {
    graph_from_edges(edges)
        .topological_sort()
        .expect("fixture should be acyclic")
}

#[test]
fn simple_fixture_order() {
    let order = sorted(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "E")]);
    assert_eq!(order, vec!["A", "B", "C", "D", "E"]);
}

#[test]
fn disjoint_fixture_interleaves_roots_first() {
    let order = sorted(&[("A", "B"), ("C", "D")]);
    assert_eq!(order, vec!["A", "C", "B", "D"]);
}

#[test]
fn multiple_sources_fixture_order() {
    let order = sorted(&[("A", "C"), ("B", "C"), ("C", "D")]);
    assert_eq!(order, vec!["A", "B", "C", "D"]);
}

#[test]
fn complex_fixture_order() {
    let edges = [
        ("A", "C"),
        ("B", "C"),
        ("B", "D"),
        ("C", "E"),
        ("D", "F"),
        ("E", "F"),
        ("E", "G"),
        ("F", "H"),
        ("G", "H"),
    ];
    let order = sorted(&edges);
    assert_eq!(order, vec!["A", "B", "C", "D", "E", "F", "G", "H"]);

    let position = |n: &str| order.iter().position(|x| x == n).unwrap();
    for (from, to) in edges {
        assert!(position(from) < position(to), "{from} must precede {to}");
    }
}

#[test]
fn isolated_nodes_keep_insertion_order() {
    let mut graph: DependencyGraph<String> = DependencyGraph::new();
    for id in ["C", "A", "B"] {
        graph.add_node(id.to_string()).unwrap();
    }
    assert_eq!(graph.topological_sort().unwrap(), vec!["C", "A", "B"]);
}

#[test]
fn empty_graph_sorts_to_nothing() {
    let graph: DependencyGraph<String> = DependencyGraph::new();
    assert_eq!(graph.topological_sort().unwrap(), Vec::<String>::new());
    assert_eq!(graph.topological_order().count(), 0);
}

#[test]
fn sort_fails_on_cycle() {
    let graph = graph_from_edges(&[("A", "B"), ("B", "C"), ("C", "A")]);

    let err = graph.topological_sort().unwrap_err();
    assert!(err.is_cycle());
    assert_eq!(
        err,
        GraphError::Cycle {
            nodes: vec!["A".to_string(), "B".to_string(), "C".to_string()]
        }
    );
}

#[test]
fn lazy_order_yields_prefix_before_cycle_error() {
    let graph = graph_from_edges(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("E", "B")]);
    let mut order = graph.topological_order();

    assert_eq!(order.next(), Some(Ok(&"A".to_string())));
    match order.next() {
        Some(Err(GraphError::Cycle { nodes })) => {
            assert_eq!(nodes, vec!["B", "C", "D", "E"]);
        }
        other => panic!("expected a cycle error, got {other:?}"),
    }
    assert_eq!(order.next(), None);
    assert_eq!(order.next(), None);
}

#[test]
fn lazy_order_can_stop_early() {
    let graph = graph_from_edges(&[("A", "B"), ("B", "C")]);

    let first: Vec<&String> = graph
        .topological_order()
        .take(1)
        .map(|item| item.unwrap())
        .collect();
    assert_eq!(first, vec!["A"]);
}

#[test]
fn repeated_sorts_are_identical() {
    let graph = graph_from_edges(&[("A", "C"), ("B", "C"), ("C", "D")]);

    let first = graph.topological_sort().unwrap();
    let second = graph.topological_sort().unwrap();
    assert_eq!(first, second);
}

#[test]
fn sort_reflects_edges_added_later() {
    let mut graph = graph_from_edges(&[("A", "B")]);
    graph.add_node("C".to_string()).unwrap();
    assert_eq!(graph.topological_sort().unwrap(), vec!["A", "C", "B"]);

    graph.add_edge("B".to_string(), "C".to_string()).unwrap();
    assert_eq!(graph.topological_sort().unwrap(), vec!["A", "B", "C"]);
}

#[test]
fn sort_and_cycle_check_agree_on_fixtures() {
    let fixtures: &[&[(&str, &str)]] = &[
        &[("A", "B"), ("B", "C"), ("C", "A")],
        &[("A", "A")],
        &[("A", "B"), ("C", "D")],
        &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("E", "B")],
    ];

    for edges in fixtures {
        let graph = graph_from_edges(edges);
        assert_eq!(graph.has_cycle(), graph.topological_sort().is_err(), "{edges:?}");
    }
}
