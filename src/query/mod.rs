//! Query planning and guarded execution.

pub mod gateway;
pub mod plan;
pub mod request;

pub use gateway::{Gateway, QueryOutcome};
pub use plan::{build_plan, ExecutionPlan, STATEMENT_TIMEOUT};
pub use request::{ConnectionParams, ConnectionTarget, QueryRequest};
