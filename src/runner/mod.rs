// src/runner/mod.rs

//! Executes a populated graph node by node.
//!
//! The [`Runner`] validates the graph, asks it for a topological order and
//! invokes each node's strategy in that order. It is fail-fast: the first
//! failing node stops the run and no dependent of it ever starts.
//!
//! With `max_concurrency == 1` nodes run one after another, walking the lazy
//! topological order. With a higher limit, independent nodes may overlap:
//! a node starts as soon as all of its predecessors have completed, up to
//! the concurrency limit. After a failure no new node is started; nodes
//! already in flight finish and their results are kept. Results are always
//! reported in topological order.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::graph::{DependencyGraph, GraphError, NodeKey};
use crate::node::GraphNode;
use crate::strategy::{Execution, ExecutionContext, ExecutionFailure};
use crate::types::InputPolicy;

pub mod error;
pub mod report;
mod state;

pub use error::RunError;
pub use report::{NodeResult, RunReport};

use state::{ReadySet, RunState};

/// Lookup from node identity to its implementation.
pub type NodeRegistry<N> = HashMap<N, GraphNode>;

/// Knobs controlling a run.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Maximum number of nodes executing at once. `1` means strictly
    /// sequential. Values below `1` are treated as `1`.
    pub max_concurrency: usize,
    /// How node inputs are chosen.
    pub input_policy: InputPolicy,
    /// Deadline passed to every strategy invocation.
    pub node_timeout: Option<Duration>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 1,
            input_policy: InputPolicy::Assigned,
            node_timeout: None,
        }
    }
}

/// Walks a [`DependencyGraph`] and executes each node through its strategy.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    options: RunnerOptions,
}

impl Runner {
    pub fn new(options: RunnerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Run every node of `graph` using the implementations in `nodes`.
    ///
    /// Cycles and unbound nodes are reported before anything executes.
    pub async fn run<N: NodeKey>(
        &self,
        graph: &DependencyGraph<N>,
        nodes: &NodeRegistry<N>,
    ) -> Result<RunReport<N>, RunError<N>> {
        let max_concurrency = self.options.max_concurrency.max(1);
        let span = info_span!(
            "workflow_run",
            nodes = graph.len(),
            edges = graph.edge_count(),
            max_concurrency,
        );

        async move {
            validate(graph, nodes)?;

            let started = Instant::now();
            let report = if max_concurrency == 1 {
                self.run_sequential(graph, nodes).await?
            } else {
                self.run_concurrent(graph, nodes, max_concurrency).await?
            };

            info!(
                completed = report.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "run finished"
            );
            Ok::<_, RunError<N>>(report)
        }
        .instrument(span)
        .await
    }

    async fn run_sequential<N: NodeKey>(
        &self,
        graph: &DependencyGraph<N>,
        nodes: &NodeRegistry<N>,
    ) -> Result<RunReport<N>, RunError<N>> {
        let mut state = RunState::new(graph, self.options.input_policy);
        let mut executed: Vec<usize> = Vec::with_capacity(graph.len());

        for item in graph.topological_order() {
            let id = item?;
            let (idx, node) = lookup(graph, nodes, id)?;

            let input = state.input_for(idx, node);
            let ctx = self.context_for(id);
            let started = Instant::now();

            debug!(node = %id, strategy = node.strategy_name(), "executing node");

            // A panic inside the task is reported like any other node failure.
            let task_node = node.clone();
            let result = tokio::spawn(
                async move { task_node.execute(input, &ctx).await }
                    .instrument(info_span!("node", node = %id)),
            )
            .await
            .unwrap_or_else(|join_err| Err(panic_failure(join_err)));

            match result {
                Ok(execution) => {
                    let elapsed = started.elapsed();
                    info!(node = %id, elapsed_ms = elapsed.as_millis() as u64, "node completed");
                    state.record_success(idx, execution, elapsed);
                    executed.push(idx);
                }
                Err(failure) => {
                    warn!(
                        node = %id,
                        kind = %failure.kind(),
                        error = %failure,
                        "node failed; stopping run"
                    );
                    return Err(RunError::NodeFailed {
                        node: id.clone(),
                        failure,
                        completed: state.take_results(&executed),
                    });
                }
            }
        }

        Ok(RunReport {
            results: state.take_results(&executed),
        })
    }

    async fn run_concurrent<N: NodeKey>(
        &self,
        graph: &DependencyGraph<N>,
        nodes: &NodeRegistry<N>,
        max_concurrency: usize,
    ) -> Result<RunReport<N>, RunError<N>> {
        let mut order = Vec::with_capacity(graph.len());
        for item in graph.topological_order() {
            let id = item?;
            let (idx, _) = lookup(graph, nodes, id)?;
            order.push(idx);
        }

        let mut ready = ReadySet::new(graph, order);
        let mut state = RunState::new(graph, self.options.input_policy);
        let mut in_flight: HashMap<tokio::task::Id, usize> = HashMap::new();
        let mut tasks: JoinSet<(Duration, Result<Execution, ExecutionFailure>)> = JoinSet::new();
        let mut first_failure: Option<(usize, ExecutionFailure)> = None;

        loop {
            while tasks.len() < max_concurrency {
                let Some(idx) = ready.pop() else { break };
                let id = graph.node_at(idx);
                let (_, node) = lookup(graph, nodes, id)?;

                let node = node.clone();
                let input = state.input_for(idx, &node);
                let ctx = self.context_for(id);

                debug!(node = %id, strategy = node.strategy_name(), "dispatching node");

                let handle = tasks.spawn(
                    async move {
                        let started = Instant::now();
                        let result = node.execute(input, &ctx).await;
                        (started.elapsed(), result)
                    }
                    .instrument(info_span!("node", node = %id)),
                );
                in_flight.insert(handle.id(), idx);
            }

            let Some(joined) = tasks.join_next_with_id().await else {
                break;
            };

            let (idx, elapsed, result) = match joined {
                Ok((task_id, (elapsed, result))) => {
                    (in_flight.remove(&task_id), elapsed, result)
                }
                Err(join_err) => {
                    let idx = in_flight.remove(&join_err.id());
                    (idx, Duration::ZERO, Err(panic_failure(join_err)))
                }
            };

            let Some(idx) = idx else {
                warn!("joined a task that was not tracked as in flight; ignoring");
                continue;
            };
            let id = graph.node_at(idx);

            match result {
                Ok(execution) => {
                    info!(node = %id, elapsed_ms = elapsed.as_millis() as u64, "node completed");
                    state.record_success(idx, execution, elapsed);
                    if first_failure.is_none() {
                        ready.complete(graph, idx);
                    }
                }
                Err(failure) => {
                    warn!(
                        node = %id,
                        kind = %failure.kind(),
                        error = %failure,
                        "node failed; no further nodes will start"
                    );
                    if first_failure.is_none() {
                        first_failure = Some((idx, failure));
                        ready.close();
                    }
                }
            }
        }

        let completed = state.take_results(ready.order());

        match first_failure {
            Some((idx, failure)) => Err(RunError::NodeFailed {
                node: graph.node_at(idx).clone(),
                failure,
                completed,
            }),
            None => Ok(RunReport { results: completed }),
        }
    }

    fn context_for<N: NodeKey>(&self, id: &N) -> ExecutionContext {
        ExecutionContext::new(id.to_string()).with_timeout(self.options.node_timeout)
    }
}

fn panic_failure(join_err: tokio::task::JoinError) -> ExecutionFailure {
    ExecutionFailure::runtime_with_cause("node task panicked", join_err)
}

/// Reject cyclic graphs and nodes without implementations up front, so a
/// bad run never executes a prefix of the graph.
fn validate<N: NodeKey>(
    graph: &DependencyGraph<N>,
    nodes: &NodeRegistry<N>,
) -> Result<(), RunError<N>> {
    if let Some(cycle) = graph.find_cycle() {
        warn!(?cycle, "refusing to run a cyclic graph");
        return Err(GraphError::Cycle { nodes: cycle }.into());
    }

    if let Some(unbound) = graph.nodes().find(|id| !nodes.contains_key(*id)) {
        return Err(RunError::UnboundNode(unbound.clone()));
    }

    Ok(())
}

fn lookup<'a, N: NodeKey>(
    graph: &DependencyGraph<N>,
    nodes: &'a NodeRegistry<N>,
    id: &N,
) -> Result<(usize, &'a GraphNode), RunError<N>> {
    match (graph.index_of(id), nodes.get(id)) {
        (Some(idx), Some(node)) => Ok((idx, node)),
        _ => Err(RunError::UnboundNode(id.clone())),
    }
}
