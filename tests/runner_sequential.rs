// tests/runner_sequential.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use dagflow::graph::GraphError;
use dagflow::strategy::{FailureKind, FnStrategy};
use dagflow::{
    GraphNode, InputPolicy, RunError, Runner, RunnerOptions, Workflow,
};
use dagflow_test_utils::builders::{graph_from_edges, workflow_with, workflow_with_inputs};
use dagflow_test_utils::strategies::{add_one, RecordingStrategy};

fn chained() -> Runner {
    Runner::new(RunnerOptions {
        input_policy: InputPolicy::Chained,
        ..RunnerOptions::default()
    })
}

#[tokio::test]
async fn chain_with_assigned_inputs_adds_one_to_each() {
    init_tracing();

    let workflow = workflow_with_inputs(
        &[("A", json!(0)), ("B", json!(1)), ("C", json!(2))],
        &[("A", "B"), ("B", "C")],
        Arc::new(add_one()),
    );

    let report = with_timeout(workflow.run(&Runner::default())).await.unwrap();

    assert_eq!(report.order(), vec!["A", "B", "C"]);
    assert_eq!(report.outputs(), vec![json!(1), json!(2), json!(3)]);
}

#[tokio::test]
async fn chained_policy_feeds_each_output_forward() {
    init_tracing();

    let workflow = workflow_with_inputs(
        &[("A", json!(0)), ("B", Value::Null), ("C", Value::Null)],
        &[("A", "B"), ("B", "C")],
        Arc::new(add_one()),
    );

    let report = with_timeout(workflow.run(&chained())).await.unwrap();
    assert_eq!(report.outputs(), vec![json!(1), json!(2), json!(3)]);
}

#[tokio::test]
async fn chained_policy_joins_multiple_predecessors_in_edge_order() {
    init_tracing();

    let strategy = RecordingStrategy::new();
    let workflow = workflow_with(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("A", "C"), ("C", "D"), ("B", "D")],
        Arc::new(strategy.clone()),
    );

    with_timeout(workflow.run(&chained())).await.unwrap();

    let inputs: HashMap<String, Value> = strategy.inputs().into_iter().collect();
    assert_eq!(inputs["A"], Value::Null);
    assert_eq!(inputs["B"], json!("A"));
    assert_eq!(inputs["D"], json!(["C", "B"]));
}

#[tokio::test]
async fn nodes_run_in_topological_order() {
    init_tracing();

    let strategy = RecordingStrategy::new();
    let workflow = workflow_with(
        &["A", "B", "C", "D", "E"],
        &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "E")],
        Arc::new(strategy.clone()),
    );

    let report = with_timeout(workflow.run(&Runner::default())).await.unwrap();

    assert_eq!(strategy.executed(), vec!["A", "B", "C", "D", "E"]);
    assert_eq!(report.order(), strategy.executed());
    assert_eq!(report.get(&"D".to_string()).unwrap().output, json!("D"));
}

#[tokio::test]
async fn failure_stops_the_run_at_the_failing_node() {
    init_tracing();

    let strategy = RecordingStrategy::new().failing_on("B");
    let workflow = workflow_with(
        &["A", "B", "C"],
        &[("A", "B"), ("B", "C")],
        Arc::new(strategy.clone()),
    );

    let err = with_timeout(workflow.run(&Runner::default())).await.unwrap_err();

    assert_eq!(strategy.executed(), vec!["A", "B"]);
    assert_eq!(err.failed_node(), Some(&"B".to_string()));
    assert_eq!(err.failure().map(|f| f.kind()), Some(FailureKind::Runtime));
    assert!(!err.is_scheduling_error());

    let completed: Vec<&str> = err.completed().iter().map(|r| r.node.as_str()).collect();
    assert_eq!(completed, vec!["A"]);

    let message = err.to_string();
    assert!(message.contains("node B failed"), "{message}");
    assert!(message.contains("runtime"), "{message}");
}

#[tokio::test]
async fn independent_branch_after_failure_never_runs() {
    init_tracing();

    // Order is A, C, B, D: C fails before B and D are reached.
    let strategy = RecordingStrategy::new().failing_on("C");
    let workflow = workflow_with(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("C", "D")],
        Arc::new(strategy.clone()),
    );

    let err = with_timeout(workflow.run(&Runner::default())).await.unwrap_err();

    assert_eq!(err.failed_node(), Some(&"C".to_string()));
    assert_eq!(strategy.executed(), vec!["A", "C"]);
}

#[tokio::test]
async fn cyclic_graph_is_rejected_before_anything_runs() {
    init_tracing();

    let strategy = RecordingStrategy::new();
    let workflow = workflow_with(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "B")],
        Arc::new(strategy.clone()),
    );

    let err = with_timeout(workflow.run(&Runner::default())).await.unwrap_err();

    assert!(err.is_scheduling_error());
    assert!(matches!(err, RunError::Graph(GraphError::Cycle { .. })));
    assert!(strategy.executed().is_empty());
}

#[tokio::test]
async fn unbound_node_is_rejected_before_anything_runs() {
    init_tracing();

    let strategy = RecordingStrategy::new();
    let graph = graph_from_edges(&[("A", "B")]);
    let mut nodes = HashMap::new();
    nodes.insert(
        "A".to_string(),
        GraphNode::new("A", Arc::new(strategy.clone())),
    );

    let err = with_timeout(Runner::default().run(&graph, &nodes))
        .await
        .unwrap_err();

    match err {
        RunError::UnboundNode(node) => assert_eq!(node, "B"),
        other => panic!("expected UnboundNode, got {other:?}"),
    }
    assert!(strategy.executed().is_empty());
}

#[tokio::test]
async fn empty_workflow_succeeds_with_no_results() {
    let workflow: Workflow<String> = Workflow::new();
    let report = workflow.run(&Runner::default()).await.unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn duplicate_node_is_rejected_by_the_workflow() {
    let mut workflow: Workflow<String> = Workflow::new();
    let strategy = Arc::new(add_one());

    workflow
        .add_node("A".to_string(), GraphNode::new("a", strategy.clone()))
        .unwrap();
    let err = workflow
        .add_node("A".to_string(), GraphNode::new("a", strategy))
        .unwrap_err();

    assert_eq!(err, GraphError::DuplicateNode("A".to_string()));
    assert_eq!(workflow.len(), 1);
}

#[tokio::test]
async fn chain_helper_links_consecutive_nodes() {
    let strategy = RecordingStrategy::new();
    let mut workflow = workflow_with(&["A", "B", "C"], &[], Arc::new(strategy.clone()));
    workflow
        .chain(["C", "A", "B"].map(String::from))
        .unwrap();

    with_timeout(workflow.run(&Runner::default())).await.unwrap();
    assert_eq!(strategy.executed(), vec!["C", "A", "B"]);
}

#[tokio::test]
async fn panicking_strategy_fails_the_node_in_both_modes() {
    init_tracing();

    for max_concurrency in [1, 4] {
        let panicking = FnStrategy::new(|_, _| panic!("boom"));
        let workflow = workflow_with(&["A", "B"], &[("A", "B")], Arc::new(panicking));
        let runner = Runner::new(RunnerOptions {
            max_concurrency,
            ..RunnerOptions::default()
        });

        let err = with_timeout(workflow.run(&runner)).await.unwrap_err();

        assert_eq!(err.failed_node(), Some(&"A".to_string()), "max_concurrency={max_concurrency}");
        assert_eq!(err.failure().map(|f| f.kind()), Some(FailureKind::Runtime));
        assert!(err.completed().is_empty());
        assert!(err.to_string().contains("node A failed (runtime)"), "{err}");
    }
}
