//! Schema introspection queries.
//!
//! Both queries go through `information_schema`, which MySQL, MariaDB and
//! PostgreSQL all provide. They run as ordinary guarded requests.

use crate::dialect::DialectProfile;
use crate::error::{GatewayError, Result};

/// Query listing user base tables as `table_schema, table_name`.
pub fn list_tables_sql(profile: &DialectProfile) -> String {
    let excluded = profile
        .system_schemas
        .iter()
        .map(|schema| quote_literal(schema))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT table_schema, table_name FROM information_schema.tables \
         WHERE table_schema NOT IN ({excluded}) AND table_type = 'BASE TABLE' \
         ORDER BY table_schema, table_name"
    )
}

/// Query describing the columns of one table.
pub fn describe_table_sql(table: &str) -> Result<String> {
    let table = table.trim();
    if table.is_empty() {
        return Err(GatewayError::invalid_request("table name is empty"));
    }
    Ok(format!(
        "SELECT column_name, data_type, character_maximum_length, column_default, is_nullable \
         FROM information_schema.columns WHERE table_name = {} ORDER BY ordinal_position",
        quote_literal(table)
    ))
}

/// Single-quoted SQL string literal with embedded quotes doubled.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
