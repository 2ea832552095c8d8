#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use dagflow::config::{ConfigSection, NodeConfig, RawWorkflowFile, StrategySection, WorkflowFile};
use dagflow::errors::Result;
use dagflow::strategy::ExecutionStrategy;
use dagflow::{DependencyGraph, GraphNode, InputPolicy, Workflow};
use serde_json::Value;

/// Builder for `RawWorkflowFile` / `WorkflowFile` to simplify test setup.
pub struct WorkflowFileBuilder {
    config: RawWorkflowFile,
}

impl WorkflowFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawWorkflowFile {
                config: ConfigSection::default(),
                strategy: StrategySection::default(),
                node: BTreeMap::new(),
            },
        }
    }

    pub fn with_node(mut self, name: &str, node: NodeConfig) -> Self {
        self.config.node.insert(name.to_string(), node);
        self
    }

    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.config.config.max_concurrency = n;
        self
    }

    pub fn input_policy(mut self, policy: InputPolicy) -> Self {
        self.config.config.input_policy = policy;
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.config.config.timeout = Some(timeout.to_string());
        self
    }

    pub fn entry_point(mut self, name: &str) -> Self {
        self.config.strategy.entry_point = name.to_string();
        self
    }

    pub fn raw(self) -> RawWorkflowFile {
        self.config
    }

    pub fn try_build(self) -> Result<WorkflowFile> {
        WorkflowFile::try_from(self.config)
    }

    pub fn build(self) -> WorkflowFile {
        self.try_build()
            .expect("Failed to build valid workflow file from builder")
    }
}

impl Default for WorkflowFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `NodeConfig`.
pub struct NodeConfigBuilder {
    node: NodeConfig,
}

impl NodeConfigBuilder {
    pub fn new(payload: &str) -> Self {
        Self {
            node: NodeConfig {
                payload: Some(payload.to_string()),
                payload_file: None,
                input: None,
                after: vec![],
            },
        }
    }

    /// Node with neither `payload` nor `payload_file` set.
    pub fn without_payload() -> Self {
        let mut builder = Self::new("");
        builder.node.payload = None;
        builder
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.node.after.push(dep.to_string());
        self
    }

    pub fn input(mut self, value: impl Into<toml::Value>) -> Self {
        self.node.input = Some(value.into());
        self
    }

    pub fn build(self) -> NodeConfig {
        self.node
    }
}

/// Graph with every edge in `edges` inserted in order; endpoints are created
/// on first mention.
pub fn graph_from_edges(edges: &[(&str, &str)]) -> DependencyGraph<String> {
    let mut graph = DependencyGraph::new();
    for (from, to) in edges {
        graph.insert_edge(from.to_string(), to.to_string());
    }
    graph
}

/// Workflow over `ids` (registered in that order) wired with `edges`, every
/// node bound to `strategy` with a `null` input.
pub fn workflow_with(
    ids: &[&str],
    edges: &[(&str, &str)],
    strategy: Arc<dyn ExecutionStrategy>,
) -> Workflow<String> {
    let inputs: Vec<(&str, Value)> = ids.iter().map(|id| (*id, Value::Null)).collect();
    workflow_with_inputs(&inputs, edges, strategy)
}

/// Like [`workflow_with`], with a pre-assigned input per node.
pub fn workflow_with_inputs(
    nodes: &[(&str, Value)],
    edges: &[(&str, &str)],
    strategy: Arc<dyn ExecutionStrategy>,
) -> Workflow<String> {
    let mut workflow = Workflow::new();
    for (id, input) in nodes {
        let node = GraphNode::new(*id, Arc::clone(&strategy)).with_input(input.clone());
        workflow
            .add_node(id.to_string(), node)
            .expect("duplicate node in test workflow");
    }
    for (from, to) in edges {
        workflow
            .add_edge(from.to_string(), to.to_string())
            .expect("unknown node in test workflow edge");
    }
    workflow
}
