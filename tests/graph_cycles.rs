// tests/graph_cycles.rs

use dagflow::DependencyGraph;
use dagflow_test_utils::builders::graph_from_edges;

#[test]
fn simple_cycle_is_detected() {
    let graph = graph_from_edges(&[("A", "B"), ("B", "C"), ("C", "A")]);

    assert!(graph.has_cycle());
    assert_eq!(graph.find_cycle().unwrap(), vec!["A", "B", "C"]);
}

#[test]
fn cycle_behind_an_acyclic_prefix_is_detected() {
    let graph = graph_from_edges(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("E", "B")]);

    assert!(graph.has_cycle());
    // The path starts at the node that was revisited; A is not part of it.
    assert_eq!(graph.find_cycle().unwrap(), vec!["B", "C", "D", "E"]);
}

#[test]
fn self_loop_is_a_cycle() {
    let graph = graph_from_edges(&[("A", "A")]);

    assert!(graph.has_cycle());
    assert_eq!(graph.find_cycle().unwrap(), vec!["A"]);
}

#[test]
fn acyclic_fixtures_have_no_cycle() {
    let fixtures: &[&[(&str, &str)]] = &[
        &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "E")],
        &[("A", "B"), ("C", "D")],
        &[("A", "C"), ("B", "C"), ("C", "D")],
        &[
            ("A", "C"),
            ("B", "C"),
            ("B", "D"),
            ("C", "E"),
            ("D", "F"),
            ("E", "F"),
            ("E", "G"),
            ("F", "H"),
            ("G", "H"),
        ],
    ];

    for edges in fixtures {
        let graph = graph_from_edges(edges);
        assert!(!graph.has_cycle(), "unexpected cycle in {edges:?}");
        assert_eq!(graph.find_cycle(), None);
    }
}

#[test]
fn empty_graph_has_no_cycle() {
    let graph: DependencyGraph<String> = DependencyGraph::new();
    assert!(!graph.has_cycle());
}

#[test]
fn repeated_checks_agree_and_track_mutation() {
    let mut graph = graph_from_edges(&[("A", "B"), ("B", "C")]);

    // A diamond-shaped revisit must not be mistaken for a cycle on a second pass.
    graph.insert_edge("A".to_string(), "C".to_string());
    assert!(!graph.has_cycle());
    assert!(!graph.has_cycle());

    graph.insert_edge("C".to_string(), "A".to_string());
    assert!(graph.has_cycle());
    assert!(graph.has_cycle());
}
