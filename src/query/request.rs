//! Query requests and connection targets.

use crate::error::{GatewayError, Result};
use url::Url;

/// Where the client should connect. Values are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// A full connection URI (e.g. `postgresql://user@host:5432/db`).
    Uri(String),
    /// Discrete connection parameters; absent ones are left to the client.
    Params(ConnectionParams),
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        Self::Params(ConnectionParams::default())
    }
}

impl ConnectionTarget {
    /// Returns a display-safe string (no password) for logging.
    pub fn display_string(&self) -> String {
        match self {
            Self::Uri(uri) => redact_uri(uri),
            Self::Params(params) => {
                let user = params.user.as_deref().unwrap_or("default");
                let host = params.host.as_deref().unwrap_or("localhost");
                let database = params.database.as_deref().unwrap_or("default");
                match params.port {
                    Some(port) => format!("{user}@{host}:{port}/{database}"),
                    None => format!("{user}@{host}/{database}"),
                }
            }
        }
    }
}

/// Masks the password of a connection URI.
pub fn redact_uri(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(mut url) => {
            if url.password().is_some() {
                // Only fails for URLs that cannot carry credentials at all.
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => "<unparseable connection uri>".to_string(),
    }
}

/// Discrete connection parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub database: Option<String>,
}

/// A single statement (or statement batch) submitted to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    text: String,
    connection: ConnectionTarget,
    force_write: bool,
}

impl QueryRequest {
    /// Creates a request. The SQL is trimmed and must not be empty.
    pub fn new(
        text: impl AsRef<str>,
        connection: ConnectionTarget,
        force_write: bool,
    ) -> Result<Self> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(GatewayError::invalid_request("query text is empty"));
        }
        Ok(Self {
            text: text.to_string(),
            connection,
            force_write,
        })
    }

    /// The trimmed SQL text as submitted.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn connection(&self) -> &ConnectionTarget {
        &self.connection
    }

    /// Whether the caller explicitly allowed destructive statements.
    pub fn force_write(&self) -> bool {
        self.force_write
    }
}
