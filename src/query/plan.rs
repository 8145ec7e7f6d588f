//! Safety policy injection.
//!
//! Turns a classified request into the exact SQL and argument vector that
//! will be handed to the client.

use std::time::Duration;

use tracing::warn;

use super::request::{ConnectionTarget, QueryRequest};
use crate::dialect::DialectProfile;
use crate::error::{GatewayError, Result};
use crate::safety::{has_transaction_boundary, Classification};

/// Server-side statement timeout injected into every plan, for every dialect.
pub const STATEMENT_TIMEOUT: Duration = Duration::from_secs(10);

const NO_TRANSACTION_WARNING: &str = "--force-write is set but the statement has no explicit \
transaction block (BEGIN; ... COMMIT;). A destructive statement will auto-commit.";

/// The fully built invocation for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// SQL handed to the client: terminated directives followed by the query.
    pub final_sql: String,
    /// Full argument vector; the last element is always `final_sql`.
    pub argv: Vec<String>,
    /// Directives prefixed to the query, in order, without terminators.
    pub directives: Vec<String>,
    /// Advisory warnings. Never blocking.
    pub warnings: Vec<String>,
}

impl ExecutionPlan {
    /// Argument vector with the final element replaced by `sql`.
    pub fn argv_with_sql(&self, sql: &str) -> Vec<String> {
        let mut argv = self.argv.clone();
        if let Some(last) = argv.last_mut() {
            *last = sql.to_string();
        }
        argv
    }
}

/// Builds the execution plan for a classified request.
///
/// Destructive statements without the override are rejected here, before any
/// process exists. The timeout directive is always injected; the read-only
/// directive only when the override is absent.
pub fn build_plan(
    request: &QueryRequest,
    classification: &Classification,
    profile: &DialectProfile,
    client_binary: &str,
) -> Result<ExecutionPlan> {
    if classification.is_destructive() && !request.force_write() {
        return Err(GatewayError::blocked(
            request.text(),
            &classification.keywords,
        ));
    }

    let mut warnings = Vec::new();
    if classification.is_destructive() && !has_transaction_boundary(request.text()) {
        warn!("{}", NO_TRANSACTION_WARNING);
        warnings.push(NO_TRANSACTION_WARNING.to_string());
    }

    let mut directives = Vec::new();
    if !request.force_write() {
        if let Some(read_only) = profile.read_only_directive {
            directives.push(read_only.to_string());
        }
    }
    directives.push(profile.timeout_directive.render(STATEMENT_TIMEOUT));

    let mut final_sql = String::new();
    for directive in &directives {
        final_sql.push_str(directive);
        final_sql.push_str("; ");
    }
    final_sql.push_str(request.text());

    let argv = build_argv(profile, client_binary, request.connection(), &final_sql)?;

    Ok(ExecutionPlan {
        final_sql,
        argv,
        directives,
        warnings,
    })
}

/// Builds the client argument vector. The execute flag and SQL come last.
fn build_argv(
    profile: &DialectProfile,
    client_binary: &str,
    connection: &ConnectionTarget,
    sql: &str,
) -> Result<Vec<String>> {
    let flags = &profile.flags;
    let mut argv = vec![client_binary.to_string()];

    match connection {
        ConnectionTarget::Uri(uri) => {
            let flag = flags.uri.ok_or_else(|| {
                GatewayError::config(format!(
                    "the {} client does not accept a connection URI; use host, port, user and database",
                    profile.name
                ))
            })?;
            argv.push(flag.to_string());
            argv.push(uri.clone());
        }
        ConnectionTarget::Params(params) => {
            let mut push = |flag: &str, value: Option<String>| {
                if let Some(value) = value {
                    argv.push(flag.to_string());
                    argv.push(value);
                }
            };
            push(flags.user, params.user.clone());
            push(flags.host, params.host.clone());
            push(flags.port, params.port.map(|p| p.to_string()));
            push(flags.database, params.database.clone());
        }
    }

    argv.extend(flags.output.iter().map(|f| f.to_string()));
    argv.push(flags.execute.to_string());
    argv.push(sql.to_string());
    Ok(argv)
}
