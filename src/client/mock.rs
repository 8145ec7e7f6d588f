//! Scripted client invoker for testing.
//!
//! Replays queued results in order and records every argument vector it was
//! handed, so tests can assert exactly what would have been executed.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ClientInvoker, RawExecutionResult};
use crate::error::{GatewayError, Result};

/// A mock invoker that returns predefined results.
#[derive(Debug, Default)]
pub struct MockInvoker {
    responses: Mutex<VecDeque<RawExecutionResult>>,
    calls: Mutex<Vec<Vec<String>>>,
    unavailable: bool,
}

impl MockInvoker {
    /// Creates a mock that answers every call with empty successful output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that replays `responses` in order, then empty successes.
    pub fn with_responses(responses: impl IntoIterator<Item = RawExecutionResult>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Creates a mock whose client binary is never found.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Returns every argument vector received so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl ClientInvoker for MockInvoker {
    async fn invoke(&self, argv: &[String]) -> Result<RawExecutionResult> {
        self.calls
            .lock()
            .map_err(|_| GatewayError::internal("mock call log poisoned"))?
            .push(argv.to_vec());

        if self.unavailable {
            let binary = argv.first().map(String::as_str).unwrap_or_default();
            return Err(GatewayError::unavailable(
                binary,
                "No such file or directory (os error 2)",
            ));
        }

        let next = self
            .responses
            .lock()
            .map_err(|_| GatewayError::internal("mock responses poisoned"))?
            .pop_front();
        Ok(next.unwrap_or_default())
    }
}
