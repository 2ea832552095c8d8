//! Fake execution strategies for runner tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dagflow::strategy::{
    BoxFuture, Execution, ExecutionContext, ExecutionFailure, ExecutionStrategy, FnStrategy,
    Payload,
};
use serde_json::Value;

/// In-process strategy returning `input + 1` for numeric inputs.
pub fn add_one() -> FnStrategy {
    FnStrategy::new(|_payload, input| match input.as_i64() {
        Some(n) => Ok(Value::from(n + 1)),
        None => Err(ExecutionFailure::runtime(format!(
            "expected an integer input, got {input}"
        ))),
    })
    .named("add-one")
}

/// A fake strategy that:
/// - records which nodes were executed, in start order
/// - optionally sleeps to simulate work
/// - fails immediately for the nodes listed in `fail_on`
/// - tracks how many executions overlapped at most.
///
/// The output of a node is its payload text.
#[derive(Clone, Default)]
pub struct RecordingStrategy {
    executed: Arc<Mutex<Vec<String>>>,
    inputs: Arc<Mutex<Vec<(String, Value)>>>,
    fail_on: Vec<String>,
    delay: Option<Duration>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl RecordingStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, node: &str) -> Self {
        self.fail_on.push(node.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Nodes in the order they started executing.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// `(node, input)` pairs in the order nodes started executing.
    pub fn inputs(&self) -> Vec<(String, Value)> {
        self.inputs.lock().unwrap().clone()
    }

    /// Highest number of executions that were running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl ExecutionStrategy for RecordingStrategy {
    fn name(&self) -> &str {
        "recording"
    }

    fn execute<'a>(
        &'a self,
        payload: &'a Payload,
        input: Value,
        ctx: &'a ExecutionContext,
    ) -> BoxFuture<'a, Result<Execution, ExecutionFailure>> {
        Box::pin(async move {
            {
                self.executed.lock().unwrap().push(ctx.node.clone());
                self.inputs.lock().unwrap().push((ctx.node.clone(), input));
            }

            // Failing nodes fail immediately, before simulating any work.
            if self.fail_on.iter().any(|n| n == &ctx.node) {
                return Err(ExecutionFailure::runtime(format!(
                    "node {} was told to fail",
                    ctx.node
                )));
            }

            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.active.fetch_sub(1, Ordering::SeqCst);

            Ok(Execution::new(Value::String(payload.as_str().to_string())))
        })
    }
}
