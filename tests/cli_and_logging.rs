// tests/cli_and_logging.rs

use clap::Parser;
use tracing::Level;

use std::path::PathBuf;

use dagflow::cli::{CliArgs, LogLevel};
use dagflow::config::default_config_path;
use dagflow::logging::resolve_level;
use dagflow::InputPolicy;

#[test]
fn defaults_point_at_dagflow_toml() {
    let args = CliArgs::try_parse_from(["dagflow"]).unwrap();

    assert_eq!(args.config, "Dagflow.toml");
    assert_eq!(PathBuf::from(&args.config), default_config_path());
    assert!(!args.dry_run);
    assert!(!args.dot);
    assert!(args.concurrency.is_none());
    assert!(args.input_policy.is_none());
    assert!(args.log_level.is_none());
}

#[test]
fn overrides_are_parsed() {
    let args = CliArgs::try_parse_from([
        "dagflow",
        "--config",
        "flows/build.toml",
        "--concurrency",
        "4",
        "--input-policy",
        "chained",
        "--log-level",
        "debug",
        "--dry-run",
    ])
    .unwrap();

    assert_eq!(args.config, "flows/build.toml");
    assert_eq!(args.concurrency, Some(4));
    assert_eq!(args.input_policy, Some(InputPolicy::Chained));
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    assert!(args.dry_run);
}

#[test]
fn dot_and_dry_run_are_exclusive() {
    assert!(CliArgs::try_parse_from(["dagflow", "--dot", "--dry-run"]).is_err());
}

#[test]
fn unknown_input_policy_is_rejected() {
    assert!(CliArgs::try_parse_from(["dagflow", "--input-policy", "broadcast"]).is_err());
}

#[test]
fn log_level_prefers_cli_then_env_then_info() {
    assert_eq!(resolve_level(Some(LogLevel::Trace), Some("error")), Level::TRACE);
    assert_eq!(resolve_level(None, Some("warning")), Level::WARN);
    assert_eq!(resolve_level(None, Some(" DEBUG ")), Level::DEBUG);
    assert_eq!(resolve_level(None, Some("chatty")), Level::INFO);
    assert_eq!(resolve_level(None, None), Level::INFO);
}
