// src/strategy/error.rs

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Type-erased underlying cause of a runtime failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a strategy could not produce a result.
#[derive(Debug, Error)]
pub enum ExecutionFailure {
    /// The payload failed to parse or compile.
    #[error("syntax error in payload: {message}")]
    Syntax { message: String },

    /// The payload does not define the required entry point.
    #[error("payload does not define entry point `{entry_point}`")]
    MissingEntryPoint { entry_point: String },

    /// The entry point exists but cannot be invoked.
    #[error("entry point `{entry_point}` is not callable")]
    NotCallable { entry_point: String },

    /// The entry point failed while running.
    #[error("runtime error: {message}")]
    Runtime {
        message: String,
        #[source]
        cause: Option<BoxError>,
    },

    /// The invocation did not finish before its deadline.
    #[error("execution timed out after {0:?}")]
    TimedOut(Duration),

    /// The backend itself could not run (spawn failure, temp files, ...).
    #[error("execution backend I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecutionFailure {
    /// Runtime failure without an underlying error value.
    pub fn runtime(message: impl Into<String>) -> Self {
        ExecutionFailure::Runtime {
            message: message.into(),
            cause: None,
        }
    }

    /// Runtime failure wrapping the original error.
    pub fn runtime_with_cause(
        message: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Self {
        ExecutionFailure::Runtime {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ExecutionFailure::Syntax { .. } => FailureKind::Syntax,
            ExecutionFailure::MissingEntryPoint { .. } => FailureKind::MissingEntryPoint,
            ExecutionFailure::NotCallable { .. } => FailureKind::NotCallable,
            ExecutionFailure::Runtime { .. } => FailureKind::Runtime,
            ExecutionFailure::TimedOut(_) => FailureKind::TimedOut,
            ExecutionFailure::Io(_) => FailureKind::Io,
        }
    }
}

/// Discriminant of [`ExecutionFailure`], for reporting and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Syntax,
    MissingEntryPoint,
    NotCallable,
    Runtime,
    TimedOut,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Syntax => "syntax",
            FailureKind::MissingEntryPoint => "missing-entry-point",
            FailureKind::NotCallable => "not-callable",
            FailureKind::Runtime => "runtime",
            FailureKind::TimedOut => "timed-out",
            FailureKind::Io => "io",
        };
        f.write_str(s)
    }
}

/// Invalid strategy construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyConfigError {
    #[error("invalid entry point name '{0}': expected a shell identifier")]
    InvalidEntryPoint(String),

    #[error("shell program must not be empty")]
    EmptyShell,
}
