//! Normalized query results.
//!
//! Values are kept exactly as the client printed them. Numbers, NULLs and
//! booleans all stay strings; callers that need types must convert.

mod normalize;

pub use normalize::normalize;

use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

/// One output row: field name to raw text, in header order.
pub type Record = Map<String, Value>;

/// Status text reported for a successful statement that printed nothing.
pub const NO_ROWS_MESSAGE: &str = "success, no rows affected";

/// The structured result of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResult {
    /// One record per data line. Never empty.
    Rows(Vec<Record>),
    /// A single status record, e.g. `{"status": "UPDATE 3"}`.
    Status(Record),
    /// A header line with no data lines.
    Empty,
    /// Output that could not be read as a table.
    Raw(String),
}

impl NormalizedResult {
    /// Wraps a one-line server acknowledgement.
    pub fn status(line: impl Into<String>) -> Self {
        let mut record = Record::new();
        record.insert("status".to_string(), Value::String(line.into()));
        Self::Status(record)
    }

    /// Success with no output at all.
    pub fn no_rows() -> Self {
        let mut record = Record::new();
        record.insert("result".to_string(), Value::String(NO_ROWS_MESSAGE.to_string()));
        Self::Status(record)
    }

    /// Wraps records, mapping an empty list to [`NormalizedResult::Empty`].
    pub fn from_rows(rows: Vec<Record>) -> Self {
        if rows.is_empty() {
            Self::Empty
        } else {
            Self::Rows(rows)
        }
    }

    /// Returns the data rows, or an empty slice for non-row results.
    pub fn rows(&self) -> &[Record] {
        match self {
            Self::Rows(rows) => rows,
            _ => &[],
        }
    }

    /// Returns the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    /// Converts into the JSON value callers receive.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Rows(rows) => Value::Array(rows.iter().cloned().map(Value::Object).collect()),
            Self::Status(record) => Value::Object(record.clone()),
            Self::Empty => Value::Array(Vec::new()),
            Self::Raw(text) => {
                let mut record = Record::new();
                record.insert("raw_output".to_string(), Value::String(text.clone()));
                Value::Object(record)
            }
        }
    }
}

impl Serialize for NormalizedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
