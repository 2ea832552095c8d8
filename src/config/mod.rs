// src/config/mod.rs

//! Workflow file loading and validation for dagflow.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a workflow file from disk (`loader.rs`).
//! - Validate invariants like DAG correctness and build the runnable
//!   workflow (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigSection, NodeConfig, RawWorkflowFile, StrategySection, WorkflowFile};
pub use validate::{parse_duration, validate_config};
