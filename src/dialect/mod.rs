//! SQL dialect descriptors.
//!
//! A [`DialectProfile`] bundles every backend-specific literal the pipeline
//! needs: destructive keywords, safety directives, client flags, output
//! format and the fallback signature. Pipeline code reads profile fields and
//! never matches on the dialect itself.

mod profiles;

pub use profiles::{MYSQL_FAMILY, POSTGRES};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL and MariaDB, both driven through the `mysql` client.
    #[serde(alias = "mariadb")]
    Mysql,
    /// PostgreSQL, driven through `psql`.
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
}

impl Dialect {
    /// Returns the profile describing this backend.
    pub fn profile(&self) -> &'static DialectProfile {
        match self {
            Self::Mysql => &MYSQL_FAMILY,
            Self::Postgres => &POSTGRES,
        }
    }

    /// Parses a dialect from a user-supplied name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::Mysql),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().name)
    }
}

/// Tabular output format requested from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab separated, unquoted (`mysql -B`).
    Tsv,
    /// Comma separated with RFC 4180 quoting (`psql --csv`).
    Csv,
}

impl OutputFormat {
    /// Field delimiter byte.
    pub fn delimiter(&self) -> u8 {
        match self {
            Self::Tsv => b'\t',
            Self::Csv => b',',
        }
    }

    /// Whether double-quote quoting is honoured when reading fields.
    pub fn quoted(&self) -> bool {
        matches!(self, Self::Csv)
    }
}

/// Unit a timeout directive expects its value in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutUnit {
    Seconds,
    Milliseconds,
}

/// A session-scoped statement-timeout preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutDirective {
    /// SQL template; `{value}` is replaced with the bound in `unit`.
    pub template: &'static str,
    pub unit: TimeoutUnit,
}

impl TimeoutDirective {
    /// Renders the directive for the given bound, without a terminator.
    pub fn render(&self, bound: Duration) -> String {
        let value = match self.unit {
            TimeoutUnit::Seconds => bound.as_secs().to_string(),
            TimeoutUnit::Milliseconds => bound.as_millis().to_string(),
        };
        self.template.replace("{value}", &value)
    }
}

/// Command-line flags understood by a dialect's client binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientFlags {
    pub user: &'static str,
    pub host: &'static str,
    pub port: &'static str,
    pub database: &'static str,
    /// Flag carrying a full connection URI; `None` if the client has none.
    pub uri: Option<&'static str>,
    /// Flags selecting batch mode and the tabular output format.
    pub output: &'static [&'static str],
    /// Flag whose value is the SQL to execute. Always emitted last.
    pub execute: &'static str,
}

/// Connection defaults applied when neither flags nor config provide a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionDefaults {
    pub user: Option<&'static str>,
    pub host: Option<&'static str>,
    pub port: Option<u16>,
}

/// Environment variables consulted for connection defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvVars {
    pub uri: Option<&'static str>,
    pub host: Option<&'static str>,
    pub port: Option<&'static str>,
    pub user: Option<&'static str>,
    pub database: Option<&'static str>,
}

/// Immutable descriptor of one SQL backend family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectProfile {
    /// Identifier used in logs and messages.
    pub name: &'static str,
    /// Default client binary.
    pub binary: &'static str,
    /// Upper-case keywords that mark a statement destructive.
    pub destructive_keywords: &'static [&'static str],
    pub timeout_directive: TimeoutDirective,
    /// Statement enforcing read-only session semantics, if the backend has one.
    pub read_only_directive: Option<&'static str>,
    pub output_format: OutputFormat,
    /// Stderr text meaning the server rejected the timeout variable.
    pub fallback_signature: Option<&'static str>,
    pub flags: ClientFlags,
    pub defaults: ConnectionDefaults,
    pub env: EnvVars,
    /// Schemas hidden from table listings.
    pub system_schemas: &'static [&'static str],
}

impl DialectProfile {
    /// Whether a rejected timeout directive may be retried once without it.
    pub fn has_timeout_fallback(&self) -> bool {
        self.fallback_signature.is_some()
    }

    /// Returns true if `stderr` carries this profile's fallback signature.
    pub fn matches_fallback(&self, stderr: &str) -> bool {
        self.fallback_signature
            .is_some_and(|signature| stderr.contains(signature))
    }
}
