// src/config/validate.rs

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::config::model::{build_strategy, RawWorkflowFile, WorkflowFile};
use crate::errors::{DagflowError, Result};
use crate::graph::DependencyGraph;
use crate::node::GraphNode;
use crate::strategy::ExecutionStrategy;
use crate::workflow::Workflow;

impl TryFrom<RawWorkflowFile> for WorkflowFile {
    type Error = DagflowError;

    fn try_from(raw: RawWorkflowFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;

        let timeout = raw.config.timeout.as_deref().map(parse_duration).transpose()?;
        // The runner passes the deadline through every invocation, so the
        // strategy itself carries none.
        let strategy: Arc<dyn ExecutionStrategy> = Arc::new(build_strategy(&raw.strategy, None)?);
        let workflow = build_workflow(&raw, strategy)?;

        Ok(WorkflowFile::new_unchecked(raw, timeout, workflow))
    }
}

/// Run every semantic check on a raw workflow file.
pub fn validate_config(cfg: &RawWorkflowFile) -> Result<()> {
    ensure_has_nodes(cfg)?;
    validate_global_config(cfg)?;
    validate_strategy(cfg)?;
    validate_payloads(cfg)?;
    validate_node_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_nodes(cfg: &RawWorkflowFile) -> Result<()> {
    if cfg.node.is_empty() {
        return Err(DagflowError::ConfigError(
            "workflow must contain at least one [node.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawWorkflowFile) -> Result<()> {
    // input_policy is strongly typed and validated during deserialization.

    if cfg.config.max_concurrency == 0 {
        return Err(DagflowError::ConfigError(
            "[config].max_concurrency must be >= 1 (got 0)".to_string(),
        ));
    }

    if let Some(ref timeout) = cfg.config.timeout {
        if parse_duration(timeout)?.is_zero() {
            return Err(DagflowError::ConfigError(format!(
                "[config].timeout must be greater than zero (got '{}')",
                timeout
            )));
        }
    }

    Ok(())
}

fn validate_strategy(cfg: &RawWorkflowFile) -> Result<()> {
    build_strategy(&cfg.strategy, None)?;
    Ok(())
}

fn validate_payloads(cfg: &RawWorkflowFile) -> Result<()> {
    for (name, node) in cfg.node.iter() {
        if node.payload.is_none() {
            return Err(DagflowError::ConfigError(format!(
                "node '{}' must set `payload` or `payload_file`",
                name
            )));
        }
    }
    Ok(())
}

fn validate_node_dependencies(cfg: &RawWorkflowFile) -> Result<()> {
    for (name, node) in cfg.node.iter() {
        for dep in node.after.iter() {
            if dep == name {
                return Err(DagflowError::ConfigError(format!(
                    "node '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !cfg.node.contains_key(dep) {
                return Err(DagflowError::ConfigError(format!(
                    "node '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawWorkflowFile) -> Result<()> {
    // Edge direction: dep -> node. For
    //   [node.B]
    //   after = ["A"]
    // we add edge A -> B.
    let mut graph: DependencyGraph<String> = DependencyGraph::new();

    for (name, node) in cfg.node.iter() {
        for dep in node.after.iter() {
            graph.insert_edge(dep.clone(), name.clone());
        }
    }

    match graph.find_cycle() {
        None => Ok(()),
        Some(cycle) => Err(DagflowError::DagCycle(format!(
            "cycle detected in node graph: {}",
            cycle.join(" -> ")
        ))),
    }
}

fn build_workflow(
    cfg: &RawWorkflowFile,
    strategy: Arc<dyn ExecutionStrategy>,
) -> Result<Workflow<String>> {
    let mut workflow = Workflow::new();

    for (name, node) in cfg.node.iter() {
        let payload = node.payload.clone().unwrap_or_default();
        let input = match node.input {
            Some(ref value) => serde_json::to_value(value).map_err(|e| {
                DagflowError::ConfigError(format!("node '{}' has an invalid input: {}", name, e))
            })?,
            None => Value::Null,
        };

        let graph_node = GraphNode::new(payload, Arc::clone(&strategy)).with_input(input);
        workflow.add_node(name.clone(), graph_node)?;
    }

    for (name, node) in cfg.node.iter() {
        for dep in node.after.iter() {
            workflow.add_edge(dep.clone(), name.clone())?;
        }
    }

    Ok(workflow)
}

/// Parse durations like `"500ms"`, `"5s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DagflowError::ConfigError("empty duration string".to_string()));
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| DagflowError::ConfigError(format!("duration '{}' is missing a unit", s)))?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part.parse().map_err(|e| {
        DagflowError::ConfigError(format!("invalid duration number '{}': {}", num_part, e))
    })?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(DagflowError::ConfigError(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            )));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| DagflowError::ConfigError(format!("duration '{}' is too large", s)))
}
