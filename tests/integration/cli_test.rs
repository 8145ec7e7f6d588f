//! Command-line tests against the built binary.

use std::process::Command;

const MISSING_CLIENT: &str = "safe-query-test-missing-client";

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_safe-query"))
        .args(args)
        .env_remove("SAFE_QUERY_DIALECT")
        .env_remove("PGURI")
        .env("SAFE_QUERY_CONFIG", "/nonexistent/safe-query/config.toml")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

#[test]
fn test_destructive_query_is_blocked() {
    let (code, stdout, stderr) = run_cli(&[
        "--dialect",
        "mysql",
        "--client-binary",
        MISSING_CLIENT,
        "query",
        "DROP TABLE t",
    ]);

    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.contains(r#""query": "DROP TABLE t""#));
    assert!(stderr.contains("--force-write"));
}

#[test]
fn test_missing_client_is_reported() {
    let (code, stdout, stderr) = run_cli(&[
        "--dialect",
        "postgres",
        "--client-binary",
        MISSING_CLIENT,
        "query",
        "SELECT 1",
    ]);

    assert_eq!(code, 127);
    assert!(stdout.is_empty());
    assert!(stderr.contains(&format!(r#""binary": "{MISSING_CLIENT}""#)));
}

#[test]
fn test_force_write_reaches_the_client() {
    let (code, _, stderr) = run_cli(&[
        "--dialect",
        "mariadb",
        "--client-binary",
        MISSING_CLIENT,
        "query",
        "DELETE FROM t",
        "--force-write",
    ]);

    // Passing the policy means the (missing) client was invoked.
    assert_eq!(code, 127);
    assert!(stderr.contains("could not be invoked"));
}

#[test]
fn test_missing_dialect_is_config_error() {
    let (code, _, stderr) = run_cli(&["query", "SELECT 1"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("No dialect configured"));
}

#[test]
fn test_mysql_rejects_uri() {
    let (code, _, stderr) = run_cli(&[
        "--dialect",
        "mysql",
        "--uri",
        "mysql://root@localhost/db",
        "--client-binary",
        MISSING_CLIENT,
        "tables",
    ]);

    assert_eq!(code, 1);
    assert!(stderr.contains("does not accept a connection URI"));
}
