// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawWorkflowFile, WorkflowFile};
use crate::errors::{DagflowError, Result};

/// Load a workflow file from a given path and return the raw `RawWorkflowFile`.
///
/// This performs TOML deserialization and inlines `payload_file` contents
/// (resolved relative to the workflow file's directory); it does **not**
/// perform semantic validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawWorkflowFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut config: RawWorkflowFile = toml::from_str(&contents)?;
    resolve_payload_files(&mut config, &base_dir(path))?;

    Ok(config)
}

/// Load a workflow file from path and validate it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - unknown or self-referencing `after` entries,
///   - cycles,
///   - global config and strategy sanity.
/// - Builds the [`Workflow`](crate::workflow::Workflow) bound to a shell strategy.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WorkflowFile> {
    let raw_config = load_from_path(&path)?;
    let config = WorkflowFile::try_from(raw_config)?;
    Ok(config)
}

/// File name looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "Dagflow.toml";

/// Default workflow file location: `Dagflow.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

fn base_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn resolve_payload_files(cfg: &mut RawWorkflowFile, base: &Path) -> Result<()> {
    for (name, node) in cfg.node.iter_mut() {
        let Some(ref file) = node.payload_file else {
            continue;
        };

        if node.payload.is_some() {
            return Err(DagflowError::ConfigError(format!(
                "node '{}' sets both `payload` and `payload_file`",
                name
            )));
        }

        let full = base.join(file);
        let source = fs::read_to_string(&full).map_err(|e| {
            DagflowError::ConfigError(format!(
                "node '{}': cannot read payload_file '{}': {}",
                name,
                full.display(),
                e
            ))
        })?;
        node.payload = Some(source);
    }
    Ok(())
}
