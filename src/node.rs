// src/node.rs

//! A unit of work: payload, pre-assigned input and the strategy that runs it.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::strategy::{Execution, ExecutionContext, ExecutionFailure, ExecutionStrategy, Payload};

/// Node implementation registered against an identity in a workflow.
///
/// Cloning is cheap: the strategy is shared behind an `Arc`.
#[derive(Clone)]
pub struct GraphNode {
    payload: Payload,
    input: Value,
    strategy: Arc<dyn ExecutionStrategy>,
}

impl GraphNode {
    /// Node with a `null` input.
    pub fn new(payload: impl Into<Payload>, strategy: Arc<dyn ExecutionStrategy>) -> Self {
        Self {
            payload: payload.into(),
            input: Value::Null,
            strategy,
        }
    }

    /// Set the pre-assigned input.
    pub fn with_input(mut self, input: impl Into<Value>) -> Self {
        self.input = input.into();
        self
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Run this node's payload against `input` through its strategy,
    /// applying the strategy's pre- and post-processing hooks.
    pub async fn execute(
        &self,
        input: Value,
        ctx: &ExecutionContext,
    ) -> Result<Execution, ExecutionFailure> {
        let input = self.strategy.preprocess_input(input);
        let execution = self.strategy.execute(&self.payload, input, ctx).await?;
        Ok(self.strategy.postprocess_output(execution))
    }
}

impl fmt::Debug for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNode")
            .field("payload", &self.payload)
            .field("input", &self.input)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
