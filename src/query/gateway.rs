//! Guarded query execution.
//!
//! Runs one request through classification, policy injection, client
//! invocation and normalization.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::plan::{build_plan, ExecutionPlan};
use super::request::{ConnectionTarget, QueryRequest};
use crate::client::{ClientInvoker, RawExecutionResult};
use crate::config::GatewayConfig;
use crate::dialect::DialectProfile;
use crate::error::Result;
use crate::output::{normalize, NormalizedResult};
use crate::safety::SqlClassifier;
use crate::schema;

/// Invocation state for one request. `Fallback` is entered at most once.
enum InvocationState {
    Primary,
    Fallback,
    Done(RawExecutionResult),
}

/// Query gateway bound to one dialect and one client invoker.
pub struct Gateway<'a> {
    profile: &'static DialectProfile,
    classifier: SqlClassifier,
    client_binary: String,
    invoker: &'a dyn ClientInvoker,
}

impl<'a> Gateway<'a> {
    /// Creates a new gateway.
    pub fn new(config: &GatewayConfig, invoker: &'a dyn ClientInvoker) -> Self {
        let profile = config.dialect.profile();
        Self {
            profile,
            classifier: SqlClassifier::for_profile(profile),
            client_binary: config
                .client_binary
                .clone()
                .unwrap_or_else(|| profile.binary.to_string()),
            invoker,
        }
    }

    /// Classifies the request and builds its plan without executing anything.
    pub fn plan(&self, request: &QueryRequest) -> Result<ExecutionPlan> {
        let classification = self.classifier.classify(request.text());
        debug!(
            "Classified as {} (keywords: {:?})",
            classification.level, classification.keywords
        );
        build_plan(request, &classification, self.profile, &self.client_binary)
    }

    /// Executes a request and returns its normalized result.
    ///
    /// Policy errors are raised before the client is invoked.
    pub async fn execute(&self, request: &QueryRequest) -> Result<QueryOutcome> {
        let start = Instant::now();
        let plan = self.plan(request)?;
        info!(
            "Executing on {} (force_write: {})",
            self.profile.name,
            request.force_write()
        );
        debug!("Final SQL: {}", plan.final_sql);

        let (raw, used_fallback) = self.invoke(&plan, request).await?;
        let result = normalize(&raw, self.profile)?;
        let execution_time = start.elapsed();

        info!(
            "Completed in {:?} ({} rows)",
            execution_time,
            result.row_count()
        );

        Ok(QueryOutcome {
            result,
            plan,
            used_fallback,
            execution_time,
        })
    }

    /// Lists user tables.
    pub async fn list_tables(&self, connection: &ConnectionTarget) -> Result<QueryOutcome> {
        let sql = schema::list_tables_sql(self.profile);
        self.execute(&QueryRequest::new(sql, connection.clone(), false)?)
            .await
    }

    /// Describes the columns of one table.
    pub async fn describe_table(
        &self,
        connection: &ConnectionTarget,
        table: &str,
    ) -> Result<QueryOutcome> {
        let sql = schema::describe_table_sql(table)?;
        self.execute(&QueryRequest::new(sql, connection.clone(), false)?)
            .await
    }

    /// Runs the primary invocation and, on the fallback signature, exactly
    /// one more with the original query text and no directives.
    async fn invoke(
        &self,
        plan: &ExecutionPlan,
        request: &QueryRequest,
    ) -> Result<(RawExecutionResult, bool)> {
        let mut state = InvocationState::Primary;
        let mut used_fallback = false;

        loop {
            state = match state {
                InvocationState::Primary => {
                    let raw = self.invoker.invoke(&plan.argv).await?;
                    if self.profile.matches_fallback(&raw.stderr) {
                        warn!(
                            "Server rejected the timeout directive; retrying once without it"
                        );
                        InvocationState::Fallback
                    } else {
                        InvocationState::Done(raw)
                    }
                }
                InvocationState::Fallback => {
                    used_fallback = true;
                    let argv = plan.argv_with_sql(request.text());
                    InvocationState::Done(self.invoker.invoke(&argv).await?)
                }
                InvocationState::Done(raw) => return Ok((raw, used_fallback)),
            };
        }
    }
}

/// Successful query execution outcome.
#[derive(Debug)]
pub struct QueryOutcome {
    /// The normalized result.
    pub result: NormalizedResult,
    /// The plan that was executed.
    pub plan: ExecutionPlan,
    /// Whether the fallback invocation ran.
    pub used_fallback: bool,
    /// Wall-clock time including any fallback.
    pub execution_time: Duration,
}
