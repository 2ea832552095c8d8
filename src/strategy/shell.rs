// src/strategy/shell.rs

//! Subprocess strategy that runs shell snippets exposing an entry point.
//!
//! A payload is shell source that must define a function named after the
//! configured entry point (`main` by default):
//!
//! ```sh
//! main() {
//!     echo "got $1"          # captured as stdout
//!     emit $(( $1 * 2 ))     # reported as the result value
//! }
//! ```
//!
//! Each invocation:
//! 1. writes the payload to a fresh temp dir and syntax-checks it with
//!    `<shell> -n`;
//! 2. runs a small driver that sources the payload, checks that the entry
//!    point is a function and calls it with the input as `$1`;
//! 3. collects what the entry point passed to `emit` (file descriptor 3,
//!    redirected to a file) as the result, and its stdout as captured text.
//!
//! The child never shares memory with the scheduler; killing it on timeout
//! is enough to cancel a node.

use std::path::Path;
use std::process::{Output, Stdio};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

use super::error::{ExecutionFailure, StrategyConfigError};
use super::{BoxFuture, Execution, ExecutionContext, ExecutionStrategy, Payload};

const DEFAULT_SHELL: &str = "sh";
const DEFAULT_ENTRY_POINT: &str = "main";
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

const PAYLOAD_FILE: &str = "payload.sh";
const RESULT_FILE: &str = "result";
const STATUS_FILE: &str = "status";

const STATUS_RAN: &str = "ran";
const STATUS_MISSING: &str = "missing";
const STATUS_NOT_CALLABLE: &str = "not-callable";

/// Exit information of a child process, kept as the cause of runtime failures.
#[derive(Debug, Clone, Error)]
#[error("process exited with {}: {stderr}", describe_code(.code))]
pub struct ProcessExit {
    pub code: Option<i32>,
    pub stderr: String,
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (killed by signal)".to_string(),
    }
}

/// Reference strategy: run a shell snippet's entry point in a child process.
#[derive(Debug, Clone)]
pub struct ShellStrategy {
    shell: String,
    entry_point: String,
    timeout: Option<Duration>,
}

impl ShellStrategy {
    /// `sh` with entry point `main` and no default timeout.
    pub fn new() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            timeout: None,
        }
    }

    /// Use a different POSIX-compatible shell (e.g. `bash`, `dash`).
    pub fn with_shell(mut self, shell: impl Into<String>) -> Result<Self, StrategyConfigError> {
        let shell = shell.into();
        if shell.trim().is_empty() {
            return Err(StrategyConfigError::EmptyShell);
        }
        self.shell = shell;
        Ok(self)
    }

    /// Use a different entry point function name.
    pub fn with_entry_point(
        mut self,
        entry_point: impl Into<String>,
    ) -> Result<Self, StrategyConfigError> {
        let entry_point = entry_point.into();
        if !is_identifier(&entry_point) {
            return Err(StrategyConfigError::InvalidEntryPoint(entry_point));
        }
        self.entry_point = entry_point;
        Ok(self)
    }

    /// Default deadline, used when the runner does not pass one.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    async fn run(&self, payload: &Payload, input: Value) -> Result<Execution, ExecutionFailure> {
        let workdir = tempfile::tempdir()?;
        let payload_path = workdir.path().join(PAYLOAD_FILE);
        let result_path = workdir.path().join(RESULT_FILE);
        let status_path = workdir.path().join(STATUS_FILE);

        tokio::fs::write(&payload_path, payload.as_str()).await?;

        self.check_syntax(&payload_path).await?;

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(driver_script(&self.entry_point))
            .arg("dagflow")
            .arg(&payload_path)
            .arg(&result_path)
            .arg(&status_path)
            .arg(encode_input(&input))
            .current_dir(workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        let status = read_optional(&status_path).await?;
        let exit = ProcessExit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };

        match status.trim() {
            STATUS_MISSING => Err(ExecutionFailure::MissingEntryPoint {
                entry_point: self.entry_point.clone(),
            }),
            STATUS_NOT_CALLABLE => Err(ExecutionFailure::NotCallable {
                entry_point: self.entry_point.clone(),
            }),
            STATUS_RAN if output.status.success() => {
                let raw = read_optional(&result_path).await?;
                Ok(Execution {
                    output: decode_output(&raw),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                })
            }
            STATUS_RAN => Err(ExecutionFailure::runtime_with_cause(
                format!("entry point `{}` failed", self.entry_point),
                exit,
            )),
            _ => Err(ExecutionFailure::runtime_with_cause(
                "payload exited before its entry point could run",
                exit,
            )),
        }
    }

    async fn check_syntax(&self, payload_path: &Path) -> Result<(), ExecutionFailure> {
        let output: Output = Command::new(&self.shell)
            .arg("-n")
            .arg(payload_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }

        Err(ExecutionFailure::Syntax {
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

impl Default for ShellStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionStrategy for ShellStrategy {
    fn name(&self) -> &str {
        "shell"
    }

    fn execute<'a>(
        &'a self,
        payload: &'a Payload,
        input: Value,
        ctx: &'a ExecutionContext,
    ) -> BoxFuture<'a, Result<Execution, ExecutionFailure>> {
        Box::pin(async move {
            let deadline = ctx.timeout.or(self.timeout);
            debug!(
                node = %ctx.node,
                shell = %self.shell,
                entry_point = %self.entry_point,
                ?deadline,
                "running shell payload"
            );

            match deadline {
                Some(limit) => match tokio::time::timeout(limit, self.run(payload, input)).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(node = %ctx.node, ?limit, "shell payload timed out; child killed");
                        Err(ExecutionFailure::TimedOut(limit))
                    }
                },
                None => self.run(payload, input).await,
            }
        })
    }
}

fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Driver run as `<shell> -c <driver> dagflow <payload> <result> <status> <input>`.
///
/// `entry_point` has been validated as an identifier, so interpolating it is safe.
fn driver_script(entry_point: &str) -> String {
    format!(
        r#"emit() {{ printf '%s\n' "$*" >&3; }}
. "$1"
case "$(type {ep} 2>/dev/null)" in
    *function*)
        printf '{ran}' > "$3"
        {ep} "$4" 3>"$2"
        exit $?
        ;;
esac
if [ "${{{ep}+set}}" = set ]; then
    printf '{not_callable}' > "$3"
else
    printf '{missing}' > "$3"
fi
"#,
        ep = entry_point,
        ran = STATUS_RAN,
        not_callable = STATUS_NOT_CALLABLE,
        missing = STATUS_MISSING,
    )
}

/// Strings are passed verbatim, `null` as an empty argument, anything else as
/// compact JSON.
fn encode_input(input: &Value) -> String {
    match input {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Emitted text is parsed as JSON when possible, otherwise kept as a string.
fn decode_output(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

async fn read_optional(path: &Path) -> std::io::Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}
