//! Concrete dialect profiles.

use super::{
    ClientFlags, ConnectionDefaults, DialectProfile, EnvVars, OutputFormat, TimeoutDirective,
    TimeoutUnit,
};

/// MySQL and MariaDB share the `mysql` client. The timeout variable is
/// MariaDB's; a MySQL server rejects it and the request is retried without.
pub static MYSQL_FAMILY: DialectProfile = DialectProfile {
    name: "mysql",
    binary: "mysql",
    destructive_keywords: &[
        "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "TRUNCATE", "REPLACE", "GRANT", "REVOKE",
    ],
    timeout_directive: TimeoutDirective {
        template: "SET SESSION max_statement_time = {value}",
        unit: TimeoutUnit::Seconds,
    },
    read_only_directive: None,
    output_format: OutputFormat::Tsv,
    fallback_signature: Some("Unknown system variable 'max_statement_time'"),
    flags: ClientFlags {
        user: "-u",
        host: "-h",
        port: "-P",
        database: "-D",
        uri: None,
        output: &["-B"],
        execute: "-e",
    },
    defaults: ConnectionDefaults {
        user: Some("root"),
        host: Some("127.0.0.1"),
        port: Some(3306),
    },
    env: EnvVars {
        uri: None,
        host: Some("MYSQL_HOST"),
        port: Some("MYSQL_TCP_PORT"),
        user: None,
        database: None,
    },
    system_schemas: &["information_schema", "mysql", "performance_schema", "sys"],
};

pub static POSTGRES: DialectProfile = DialectProfile {
    name: "postgres",
    binary: "psql",
    destructive_keywords: &["DROP", "TRUNCATE", "ALTER", "DELETE", "UPDATE", "INSERT"],
    timeout_directive: TimeoutDirective {
        template: "SET statement_timeout = '{value}'",
        unit: TimeoutUnit::Milliseconds,
    },
    read_only_directive: Some("SET SESSION CHARACTERISTICS AS TRANSACTION READ ONLY"),
    output_format: OutputFormat::Csv,
    fallback_signature: None,
    flags: ClientFlags {
        user: "-U",
        host: "-h",
        port: "-p",
        database: "-d",
        uri: Some("-d"),
        output: &["--csv"],
        execute: "-c",
    },
    defaults: ConnectionDefaults {
        user: None,
        host: None,
        port: None,
    },
    env: EnvVars {
        uri: Some("PGURI"),
        host: None,
        port: None,
        user: None,
        database: None,
    },
    system_schemas: &["information_schema", "pg_catalog"],
};
