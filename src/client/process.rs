//! Invoker backed by a real child process.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{ClientInvoker, RawExecutionResult};
use crate::error::{GatewayError, Result};

/// Runs the client binary as a child process.
///
/// Without a deadline a hung client blocks the request indefinitely; bounding
/// it is left to the caller (or to [`ProcessInvoker::with_deadline`]).
#[derive(Debug, Clone, Default)]
pub struct ProcessInvoker {
    deadline: Option<Duration>,
}

impl ProcessInvoker {
    /// Creates an invoker with no wall-clock deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an invoker that kills the client after `deadline`.
    pub fn with_deadline(deadline: Option<Duration>) -> Self {
        Self { deadline }
    }
}

#[async_trait]
impl ClientInvoker for ProcessInvoker {
    async fn invoke(&self, argv: &[String]) -> Result<RawExecutionResult> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| GatewayError::internal("empty client argument vector"))?;

        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);

        debug!("Spawning {} with {} arguments", program, args.len());

        let output = match self.deadline {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| GatewayError::timed_out(program, limit))?,
            None => command.output().await,
        }
        .map_err(|e| GatewayError::unavailable(program, e.to_string()))?;

        Ok(RawExecutionResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let invoker = ProcessInvoker::new();
        let err = invoker
            .invoke(&argv(&["safe-query-no-such-client-binary", "-e", "SELECT 1"]))
            .await
            .unwrap_err();
        match err {
            GatewayError::CollaboratorUnavailable { binary, .. } => {
                assert_eq!(binary, "safe-query-no-such-client-binary");
            }
            other => panic!("Expected CollaboratorUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_argv_is_internal_error() {
        let err = ProcessInvoker::new().invoke(&[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Internal(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_exit_code_and_streams() {
        let result = ProcessInvoker::new()
            .invoke(&argv(&["sh", "-c", "printf 'a\\tb\\n1\\t2'; printf oops >&2; exit 3"]))
            .await
            .unwrap();
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout, "a\tb\n1\t2");
        assert_eq!(result.stderr, "oops");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_deadline_kills_slow_client() {
        let invoker = ProcessInvoker::with_deadline(Some(Duration::from_millis(100)));
        let err = invoker
            .invoke(&argv(&["sh", "-c", "sleep 5"]))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvocationTimedOut { .. }));
    }
}
