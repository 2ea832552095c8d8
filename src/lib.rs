// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod node;
pub mod runner;
pub mod strategy;
pub mod types;
pub mod workflow;

pub use graph::{DependencyGraph, GraphError, NodeKey, TopologicalOrder};
pub use node::GraphNode;
pub use runner::{NodeResult, RunError, RunReport, Runner, RunnerOptions};
pub use strategy::{ExecutionStrategy, FnStrategy, Payload, ShellStrategy};
pub use types::InputPolicy;
pub use workflow::Workflow;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::WorkflowFile;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - workflow file loading and validation
/// - CLI overrides of `[config]`
/// - the runner
/// - result printing
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading workflow file {}", config_path.display()))?;

    if args.dot {
        print!("{}", cfg.workflow().graph().to_dot());
        return Ok(());
    }

    let options = runner_options(&cfg, &args)?;

    if args.dry_run {
        print_dry_run(&cfg, &options)?;
        return Ok(());
    }

    info!(
        path = %config_path.display(),
        nodes = cfg.workflow().len(),
        max_concurrency = options.max_concurrency,
        "starting workflow"
    );

    let runner = Runner::new(options);
    match cfg.workflow().run(&runner).await {
        Ok(report) => {
            print_results(report.results.iter());
            Ok(())
        }
        Err(err) => {
            // Whatever finished before the failure is still worth showing.
            print_results(err.completed().iter());
            Err(err.into())
        }
    }
}

/// `[config]` with CLI flags layered on top.
fn runner_options(cfg: &WorkflowFile, args: &CliArgs) -> Result<RunnerOptions> {
    let mut options = cfg.runner_options();

    if let Some(n) = args.concurrency {
        if n == 0 {
            bail!("--concurrency must be >= 1");
        }
        options.max_concurrency = n;
    }
    if let Some(policy) = args.input_policy {
        options.input_policy = policy;
    }

    Ok(options)
}

fn print_results<'a>(results: impl Iterator<Item = &'a NodeResult<String>>) {
    for result in results {
        println!("{}: {}", result.node, result.output);
        for line in result.stdout.lines() {
            println!("    | {line}");
        }
    }
}

/// Simple dry-run output: print nodes, deps and the execution order.
fn print_dry_run(cfg: &WorkflowFile, options: &RunnerOptions) -> Result<()> {
    let order = cfg.workflow().graph().topological_sort()?;

    println!("dagflow dry-run");
    println!("  config.max_concurrency = {}", options.max_concurrency);
    println!("  config.input_policy = {:?}", options.input_policy);
    if let Some(timeout) = options.node_timeout {
        println!("  config.timeout = {:?}", timeout);
    }
    println!(
        "  strategy = {} (entry point `{}`)",
        cfg.strategy.shell, cfg.strategy.entry_point
    );
    println!();

    println!("nodes ({}):", cfg.node.len());
    for (name, node) in cfg.node.iter() {
        println!("  - {name}");
        if let Some(ref file) = node.payload_file {
            println!("      payload_file: {}", file.display());
        }
        if let Some(ref input) = node.input {
            println!("      input: {input}");
        }
        if !node.after.is_empty() {
            println!("      after: {:?}", node.after);
        }
    }
    println!();

    let roots: Vec<&str> = cfg.workflow().graph().roots().map(String::as_str).collect();
    println!("roots: {}", roots.join(", "));
    println!("order: {}", order.join(" -> "));

    debug!("dry-run complete (no execution)");
    Ok(())
}
