// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::runner::RunnerOptions;
use crate::strategy::ShellStrategy;
use crate::types::InputPolicy;
use crate::workflow::Workflow;

/// Workflow file exactly as deserialised from TOML, before validation.
///
/// ```toml
/// [config]
/// max_concurrency = 2
/// input_policy = "chained"
/// timeout = "5s"
///
/// [strategy]
/// shell = "sh"
/// entry_point = "main"
///
/// [node.A]
/// payload = "main() { emit $(( $1 + 1 )); }"
/// input = 0
///
/// [node.B]
/// payload_file = "scripts/b.sh"
/// after = ["A"]
/// ```
///
/// All sections are optional and have reasonable defaults; validation
/// rejects a file without nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkflowFile {
    /// Run behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Shell strategy settings from `[strategy]`.
    #[serde(default)]
    pub strategy: StrategySection,

    /// All nodes from `[node.<name>]`, keyed by node name.
    #[serde(default)]
    pub node: BTreeMap<String, NodeConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Maximum number of nodes running at once (>= 1).
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// `"assigned"` (default) or `"chained"`.
    #[serde(default)]
    pub input_policy: InputPolicy,

    /// Per-node deadline such as `"500ms"`, `"5s"`, `"2m"` or `"1h"`.
    #[serde(default)]
    pub timeout: Option<String>,
}

fn default_max_concurrency() -> usize {
    1
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            input_policy: InputPolicy::default(),
            timeout: None,
        }
    }
}

/// `[strategy]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategySection {
    #[serde(default = "default_shell")]
    pub shell: String,

    #[serde(default = "default_entry_point")]
    pub entry_point: String,
}

fn default_shell() -> String {
    "sh".to_string()
}

fn default_entry_point() -> String {
    "main".to_string()
}

impl Default for StrategySection {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            entry_point: default_entry_point(),
        }
    }
}

/// `[node.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Inline shell source defining the entry point.
    #[serde(default)]
    pub payload: Option<String>,

    /// Path to a file holding the payload, relative to the workflow file.
    ///
    /// Exactly one of `payload` / `payload_file` must be set.
    #[serde(default)]
    pub payload_file: Option<PathBuf>,

    /// Pre-assigned input value; absent means `null`.
    #[serde(default)]
    pub input: Option<toml::Value>,

    /// Dependencies: this node waits for every node listed here.
    #[serde(default)]
    pub after: Vec<String>,
}

/// Validated workflow file.
///
/// Obtained through `TryFrom<RawWorkflowFile>` (see `config::validate`), so
/// holding one means the node graph is acyclic and every reference resolves.
#[derive(Debug, Clone)]
pub struct WorkflowFile {
    pub config: ConfigSection,
    pub strategy: StrategySection,
    pub node: BTreeMap<String, NodeConfig>,
    timeout: Option<Duration>,
    workflow: Workflow<String>,
}

impl WorkflowFile {
    pub(crate) fn new_unchecked(
        raw: RawWorkflowFile,
        timeout: Option<Duration>,
        workflow: Workflow<String>,
    ) -> Self {
        Self {
            config: raw.config,
            strategy: raw.strategy,
            node: raw.node,
            timeout,
            workflow,
        }
    }

    /// Runner options described by `[config]`.
    pub fn runner_options(&self) -> RunnerOptions {
        RunnerOptions {
            max_concurrency: self.config.max_concurrency,
            input_policy: self.config.input_policy,
            node_timeout: self.timeout,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The workflow built from `[node.*]`, bound to a [`ShellStrategy`].
    pub fn workflow(&self) -> &Workflow<String> {
        &self.workflow
    }

    pub fn into_workflow(self) -> Workflow<String> {
        self.workflow
    }
}

/// Strategy described by `[strategy]`.
pub(crate) fn build_strategy(
    section: &StrategySection,
    timeout: Option<Duration>,
) -> Result<ShellStrategy, crate::strategy::StrategyConfigError> {
    Ok(ShellStrategy::new()
        .with_shell(section.shell.clone())?
        .with_entry_point(section.entry_point.clone())?
        .with_timeout(timeout))
}
