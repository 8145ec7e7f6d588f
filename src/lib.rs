//! safe-query - a guarded SQL execution gateway.
//!
//! Classifies a statement, injects session safety directives, runs it through
//! the dialect's command-line client and normalizes the tabular output into
//! JSON records.

pub mod client;
pub mod config;
pub mod dialect;
pub mod error;
pub mod logging;
pub mod output;
pub mod query;
pub mod safety;
pub mod schema;
