//! safe-query - run SQL through mysql or psql behind a safety guard.

mod cli;

use cli::{Cli, Command};
use safe_query::client::ProcessInvoker;
use safe_query::config::Config;
use safe_query::error::{GatewayError, Result};
use safe_query::logging;
use safe_query::query::{Gateway, QueryRequest};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init_stderr_logging();

    match run().await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}", render(&e.to_record()));
            std::process::exit(e.exit_code());
        }
    }
}

async fn run() -> Result<String> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load configuration file
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let overrides = cli.to_connection_config()?;
    let (gateway_config, target) =
        config.resolve(&overrides, cli.connection_name(), cli.timeout)?;
    info!(
        "Dialect: {}, connection: {}",
        gateway_config.dialect,
        target.display_string()
    );

    let invoker = ProcessInvoker::with_deadline(gateway_config.invocation_timeout);
    let gateway = Gateway::new(&gateway_config, &invoker);

    let outcome = match &cli.command {
        Command::Query { sql, force_write } => {
            let request = QueryRequest::new(sql, target, *force_write)?;
            gateway.execute(&request).await?
        }
        Command::Tables => gateway.list_tables(&target).await?,
        Command::Describe { table } => gateway.describe_table(&target, table).await?,
    };

    if outcome.used_fallback {
        info!("Query ran without the timeout directive after a fallback");
    }

    serde_json::to_string_pretty(&outcome.result)
        .map_err(|e| GatewayError::internal(format!("Failed to serialize result: {e}")))
}

fn render(record: &serde_json::Value) -> String {
    serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string())
}
