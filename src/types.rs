// src/types.rs

use std::str::FromStr;

use serde::Deserialize;

/// How a node's input is chosen when the runner invokes it.
///
/// - `Assigned`: every node receives the input it was constructed with
///   (default behaviour).
/// - `Chained`: a node receives its predecessors' outputs. With a single
///   predecessor that output is passed as-is; with several, a JSON array of
///   outputs in edge insertion order. Nodes without predecessors fall back to
///   their assigned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    #[default]
    Assigned,
    Chained,
}

impl FromStr for InputPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assigned" => Ok(InputPolicy::Assigned),
            "chained" => Ok(InputPolicy::Chained),
            other => Err(format!(
                "invalid input_policy: {other} (expected \"assigned\" or \"chained\")"
            )),
        }
    }
}
