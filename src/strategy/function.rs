// src/strategy/function.rs

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{BoxFuture, Execution, ExecutionContext, ExecutionFailure, ExecutionStrategy, Payload};

type NodeFn = dyn Fn(&Payload, Value) -> Result<Value, ExecutionFailure> + Send + Sync;

/// In-process strategy backed by a Rust closure.
///
/// The closure receives the node payload and its input. Nothing is written to
/// stdout, so [`Execution::stdout`] is always empty. Deadlines are not
/// enforced: the closure runs to completion on the calling task.
#[derive(Clone)]
pub struct FnStrategy {
    name: String,
    f: Arc<NodeFn>,
}

impl FnStrategy {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Payload, Value) -> Result<Value, ExecutionFailure> + Send + Sync + 'static,
    {
        Self {
            name: "fn".to_string(),
            f: Arc::new(f),
        }
    }

    /// Set the name reported in logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl fmt::Debug for FnStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStrategy")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ExecutionStrategy for FnStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute<'a>(
        &'a self,
        payload: &'a Payload,
        input: Value,
        _ctx: &'a ExecutionContext,
    ) -> BoxFuture<'a, Result<Execution, ExecutionFailure>> {
        Box::pin(async move { (self.f)(payload, input).map(Execution::new) })
    }
}
