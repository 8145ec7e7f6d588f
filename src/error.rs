//! Error types for safe-query.
//!
//! Every failure a request can hit is one of these variants. Callers see them
//! either as a Rust error or, at the process boundary, as a JSON error record.

use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Main error type for gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// A destructive statement was submitted without the force-write override.
    #[error(
        "Destructive query detected ({}). You must explicitly provide the --force-write flag to execute this query.",
        .keywords.join(", ")
    )]
    PolicyBlocked {
        query: String,
        keywords: Vec<String>,
    },

    /// The database client ran but exited non-zero.
    #[error("Backend execution failed (exit code {exit_code}): {stderr}")]
    BackendExecutionFailed { exit_code: i32, stderr: String },

    /// The database client binary could not be started at all.
    #[error("Database client '{binary}' could not be invoked: {reason}")]
    CollaboratorUnavailable { binary: String, reason: String },

    /// The invocation deadline elapsed before the client exited.
    #[error("Database client '{binary}' did not finish within {}s", .limit.as_secs())]
    InvocationTimedOut { binary: String, limit: Duration },

    /// The request itself is unusable (empty SQL, empty table name, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration errors (bad config file, unknown dialect, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Creates a policy error for a blocked destructive statement.
    pub fn blocked(query: impl Into<String>, keywords: &[&str]) -> Self {
        Self::PolicyBlocked {
            query: query.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Creates a backend failure from a client's exit code and stderr.
    pub fn backend(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::BackendExecutionFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates an error for a client binary that could not be spawned.
    pub fn unavailable(binary: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CollaboratorUnavailable {
            binary: binary.into(),
            reason: reason.into(),
        }
    }

    /// Creates an error for an invocation that outlived its deadline.
    pub fn timed_out(binary: impl Into<String>, limit: Duration) -> Self {
        Self::InvocationTimedOut {
            binary: binary.into(),
            limit,
        }
    }

    /// Creates an invalid request error with the given message.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::PolicyBlocked { .. } => "Policy Blocked",
            Self::BackendExecutionFailed { .. } => "Backend Error",
            Self::CollaboratorUnavailable { .. } => "Client Unavailable",
            Self::InvocationTimedOut { .. } => "Client Timeout",
            Self::InvalidRequest(_) => "Invalid Request",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Process exit code used by the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PolicyBlocked { .. } => 2,
            Self::CollaboratorUnavailable { .. } => 127,
            Self::InvocationTimedOut { .. } => 124,
            _ => 1,
        }
    }

    /// Renders the error as the caller-visible JSON error record.
    ///
    /// Backend stderr is carried through unmodified so operators can see
    /// exactly what the server reported.
    pub fn to_record(&self) -> Value {
        match self {
            Self::PolicyBlocked { query, .. } => json!({
                "error": self.to_string(),
                "query": query,
            }),
            Self::BackendExecutionFailed { exit_code, stderr } => json!({
                "error": "Database client failed",
                "exit_code": exit_code,
                "stderr": stderr,
            }),
            Self::CollaboratorUnavailable { binary, .. }
            | Self::InvocationTimedOut { binary, .. } => json!({
                "error": self.to_string(),
                "binary": binary,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

/// Result type alias using GatewayError.
pub type Result<T> = std::result::Result<T, GatewayError>;
