//! End-to-end pipeline tests through the public API.

use pretty_assertions::assert_eq;
use safe_query::client::{MockInvoker, RawExecutionResult};
use safe_query::config::{Config, ConnectionConfig, GatewayConfig};
use safe_query::dialect::Dialect;
use safe_query::error::GatewayError;
use safe_query::query::{ConnectionParams, ConnectionTarget, Gateway, QueryRequest};
use serde_json::json;

fn mysql_target() -> ConnectionTarget {
    ConnectionTarget::Params(ConnectionParams {
        host: Some("127.0.0.1".to_string()),
        port: Some(3306),
        user: Some("root".to_string()),
        database: Some("shop".to_string()),
    })
}

fn pg_target() -> ConnectionTarget {
    ConnectionTarget::Uri("postgresql://app@localhost:5432/app".to_string())
}

#[tokio::test]
async fn test_select_one_on_mysql() {
    let mock = MockInvoker::with_responses([RawExecutionResult::success("1\n1\n")]);
    let gateway = Gateway::new(&GatewayConfig::new(Dialect::Mysql), &mock);

    let request = QueryRequest::new("SELECT 1", mysql_target(), false).unwrap();
    let outcome = gateway.execute(&request).await.unwrap();

    assert_eq!(
        serde_json::to_value(&outcome.result).unwrap(),
        json!([{"1": "1"}])
    );
    assert_eq!(
        mock.calls(),
        vec![vec![
            "mysql",
            "-u",
            "root",
            "-h",
            "127.0.0.1",
            "-P",
            "3306",
            "-D",
            "shop",
            "-B",
            "-e",
            "SET SESSION max_statement_time = 10; SELECT 1",
        ]]
    );
}

#[tokio::test]
async fn test_blocked_statements_never_reach_the_client() {
    for (dialect, target) in [(Dialect::Mysql, mysql_target()), (Dialect::Postgres, pg_target())] {
        let mock = MockInvoker::new();
        let gateway = Gateway::new(&GatewayConfig::new(dialect), &mock);

        for sql in ["DROP TABLE t", "delete from t", "SELECT 1; UPDATE t SET a = 1"] {
            let request = QueryRequest::new(sql, target.clone(), false).unwrap();
            let err = gateway.execute(&request).await.unwrap_err();
            assert!(matches!(err, GatewayError::PolicyBlocked { .. }), "{sql}");
            assert_eq!(err.to_record()["query"], sql);
        }
        assert_eq!(mock.call_count(), 0);
    }
}

#[tokio::test]
async fn test_safe_statements_always_start_with_directives() {
    let mock = MockInvoker::new();
    let gateway = Gateway::new(&GatewayConfig::new(Dialect::Postgres), &mock);

    for sql in [
        "SELECT 1",
        "SELECT update_count FROM stats",
        "WITH x AS (SELECT 1) SELECT * FROM x",
        "EXPLAIN SELECT * FROM orders",
    ] {
        let request = QueryRequest::new(sql, pg_target(), false).unwrap();
        gateway.execute(&request).await.unwrap();
    }

    for call in mock.calls() {
        let sql = call.last().unwrap();
        assert!(sql.starts_with(
            "SET SESSION CHARACTERISTICS AS TRANSACTION READ ONLY; SET statement_timeout = '10000'; "
        ));
    }
}

#[tokio::test]
async fn test_mariadb_fallback_against_mysql_server() {
    let mock = MockInvoker::with_responses([
        RawExecutionResult::failure(
            1,
            "ERROR 1193 (HY000) at line 1: Unknown system variable 'max_statement_time'\n",
        ),
        RawExecutionResult::success("id\tname\n1\tAda\n2\tGrace"),
    ]);
    let gateway = Gateway::new(&GatewayConfig::new(Dialect::Mysql), &mock);

    let request = QueryRequest::new("SELECT id, name FROM users", mysql_target(), false).unwrap();
    let outcome = gateway.execute(&request).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].last().unwrap(), "SELECT id, name FROM users");
    assert!(outcome.used_fallback);
    assert_eq!(
        outcome.result.to_json(),
        json!([{"id": "1", "name": "Ada"}, {"id": "2", "name": "Grace"}])
    );
}

#[tokio::test]
async fn test_backend_error_keeps_stderr() {
    let stderr = "ERROR:  relation \"missing\" does not exist\nLINE 1: SELECT * FROM missing\n";
    let mock = MockInvoker::with_responses([RawExecutionResult::failure(1, stderr)]);
    let gateway = Gateway::new(&GatewayConfig::new(Dialect::Postgres), &mock);

    let request = QueryRequest::new("SELECT * FROM missing", pg_target(), false).unwrap();
    let err = gateway.execute(&request).await.unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.to_record()["stderr"], stderr.trim());
}

#[tokio::test]
async fn test_config_resolution_feeds_gateway() {
    let toml = r#"
[connections.default]
dialect = "postgres"
uri = "postgresql://report@warehouse/analytics"
client_binary = "/usr/lib/postgresql/16/bin/psql"
"#;
    let config: Config = toml::from_str(toml).unwrap();
    let (gateway_config, target) = config
        .resolve_with(&ConnectionConfig::default(), None, None, |_| None)
        .unwrap();

    let mock = MockInvoker::with_responses([RawExecutionResult::success(
        "table_schema,table_name\npublic,orders\n",
    )]);
    let gateway = Gateway::new(&gateway_config, &mock);
    let outcome = gateway.list_tables(&target).await.unwrap();

    let call = &mock.calls()[0];
    assert_eq!(call[0], "/usr/lib/postgresql/16/bin/psql");
    assert_eq!(call[1..3], ["-d", "postgresql://report@warehouse/analytics"]);
    assert_eq!(
        outcome.result.to_json(),
        json!([{"table_schema": "public", "table_name": "orders"}])
    );
}
