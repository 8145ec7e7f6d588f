//! Integration tests for safe-query.

pub mod cli_test;
pub mod gateway_test;
