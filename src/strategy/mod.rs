// src/strategy/mod.rs

//! Pluggable execution backends.
//!
//! The runner never executes a payload itself; it hands the payload and an
//! input value to an [`ExecutionStrategy`] and observes success or failure.
//!
//! - [`function`] provides [`FnStrategy`], which runs a Rust closure
//!   in-process.
//! - [`shell`] provides [`ShellStrategy`], which runs a shell snippet
//!   exposing a `main` entry point in a child process.
//! - [`error`] defines the failure taxonomy shared by all strategies.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;

pub mod error;
pub mod function;
pub mod shell;

pub use error::{BoxError, ExecutionFailure, FailureKind, StrategyConfigError};
pub use function::FnStrategy;
pub use shell::ShellStrategy;

/// Boxed future returned by strategies, so the trait stays object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Opaque description of the work a node performs (source text, a task
/// descriptor, ...). Only the strategy interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Payload(String);

impl Payload {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Successful result of one execution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Execution {
    /// Value produced by the payload.
    pub output: Value,
    /// Text the payload wrote to standard output.
    pub stdout: String,
}

impl Execution {
    pub fn new(output: Value) -> Self {
        Self {
            output,
            stdout: String::new(),
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }
}

/// Per-invocation information passed from the runner to a strategy.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Display form of the node identity, for logging.
    pub node: String,
    /// Deadline for this invocation. Enforcing it is up to the strategy.
    pub timeout: Option<Duration>,
}

impl ExecutionContext {
    pub fn new(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Trait abstracting how a node's payload actually runs.
///
/// Implementations may run code in-process, spawn child processes or talk to
/// a remote sandbox. The pre/post hooks default to pass-through and can be
/// overridden without touching [`execute`](Self::execute).
pub trait ExecutionStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str {
        "strategy"
    }

    /// Adjust the input before execution.
    fn preprocess_input(&self, input: Value) -> Value {
        input
    }

    /// Run `payload` against `input`.
    fn execute<'a>(
        &'a self,
        payload: &'a Payload,
        input: Value,
        ctx: &'a ExecutionContext,
    ) -> BoxFuture<'a, Result<Execution, ExecutionFailure>>;

    /// Adjust a successful execution before it is reported.
    fn postprocess_output(&self, execution: Execution) -> Execution {
        execution
    }
}
