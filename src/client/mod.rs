//! Database client invocation.
//!
//! The gateway never talks to a server directly. It hands an argument vector
//! to a [`ClientInvoker`], which runs the dialect's command-line client and
//! reports what came back.

mod mock;
mod process;

pub use mock::MockInvoker;
pub use process::ProcessInvoker;

use crate::error::Result;
use async_trait::async_trait;

/// Captured outcome of one client invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExecutionResult {
    /// Process exit code; `-1` if the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RawExecutionResult {
    /// A zero-exit result with the given standard output.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed result with the given exit code and standard error.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns true if the client exited with status zero.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait defining the interface for running a database client.
///
/// `argv[0]` is the binary; the remaining elements are passed verbatim. The
/// child's stdin is never read from. Implementations report a client that
/// cannot be started as [`GatewayError::CollaboratorUnavailable`] and do not
/// retry.
///
/// [`GatewayError::CollaboratorUnavailable`]: crate::error::GatewayError::CollaboratorUnavailable
#[async_trait]
pub trait ClientInvoker: Send + Sync {
    /// Runs the client once and captures its exit code and output.
    async fn invoke(&self, argv: &[String]) -> Result<RawExecutionResult>;
}
