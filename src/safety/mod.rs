//! Query safety classification module.
//!
//! Decides whether a statement is destructive by whole-word keyword matching
//! against the active dialect profile. There is deliberately no SQL parser
//! here: a keyword inside a string literal or comment still counts, and a
//! destructive statement spelled without any listed keyword (e.g. `CREATE`)
//! does not. The server-side read-only and timeout directives are the second
//! layer behind this guard.

mod classifier;

pub use classifier::{classify, has_transaction_boundary, SqlClassifier};

use std::fmt;

/// Safety level classification for SQL queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyLevel {
    /// No destructive keyword found; runs under the session safety directives.
    Safe,
    /// Contains a destructive keyword; requires the force-write override.
    Destructive,
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Destructive => write!(f, "Destructive"),
        }
    }
}

/// Result of classifying a SQL query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The determined safety level.
    pub level: SafetyLevel,
    /// Destructive keywords found, in profile order.
    pub keywords: Vec<&'static str>,
}

impl Classification {
    /// Builds a classification from the keywords that matched.
    pub fn from_matches(keywords: Vec<&'static str>) -> Self {
        let level = if keywords.is_empty() {
            SafetyLevel::Safe
        } else {
            SafetyLevel::Destructive
        };
        Self { level, keywords }
    }

    /// Returns true if the statement needs the force-write override.
    pub fn is_destructive(&self) -> bool {
        self.level == SafetyLevel::Destructive
    }
}
