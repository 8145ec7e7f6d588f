//! Configuration management for safe-query.
//!
//! Handles loading configuration from TOML files and environment variables,
//! and resolves everything into an explicit [`GatewayConfig`] plus a
//! [`ConnectionTarget`]. Nothing here is consulted implicitly by the gateway.

use crate::dialect::{Dialect, DialectProfile};
use crate::error::{GatewayError, Result};
use crate::query::{ConnectionParams, ConnectionTarget};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Dialect used when neither the CLI nor the connection names one.
    pub dialect: Option<Dialect>,

    /// Wall-clock limit for one client invocation. Unset means no limit.
    pub invocation_timeout_secs: Option<u64>,

    /// Named database connections.
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
}

/// Database connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Backend dialect for this connection.
    pub dialect: Option<Dialect>,

    /// Database host.
    pub host: Option<String>,

    /// Database port.
    pub port: Option<u16>,

    /// Database user.
    pub user: Option<String>,

    /// Database name.
    pub database: Option<String>,

    /// Full connection URI. Takes precedence over the discrete fields.
    pub uri: Option<String>,

    /// Client binary to run instead of the dialect's default.
    pub client_binary: Option<String>,
}

/// Everything the gateway needs at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub dialect: Dialect,
    /// Overrides the profile's client binary.
    pub client_binary: Option<String>,
    /// Deadline for one client invocation.
    pub invocation_timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Config for a dialect with its default binary and no deadline.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            client_binary: None,
            invocation_timeout: None,
        }
    }
}

impl ConnectionConfig {
    /// Merges another config into this one, with the other taking precedence.
    ///
    /// Discrete parameters in `other` without a URI of its own replace an
    /// inherited URI.
    pub fn merge(&mut self, other: &ConnectionConfig) {
        if other.uri.is_none() && other.has_params() {
            self.uri = None;
        }
        if other.dialect.is_some() {
            self.dialect = other.dialect;
        }
        if other.host.is_some() {
            self.host = other.host.clone();
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.user.is_some() {
            self.user = other.user.clone();
        }
        if other.database.is_some() {
            self.database = other.database.clone();
        }
        if other.uri.is_some() {
            self.uri = other.uri.clone();
        }
        if other.client_binary.is_some() {
            self.client_binary = other.client_binary.clone();
        }
    }

    /// Applies environment defaults read through `lookup`.
    ///
    /// An environment URI is only used when no discrete parameter was given,
    /// so explicit flags are never silently shadowed by it.
    pub fn apply_env_with(
        &mut self,
        profile: &DialectProfile,
        lookup: impl Fn(&str) -> Option<String>,
    ) {
        let env = &profile.env;
        let fetch = |name: Option<&str>| name.and_then(&lookup);

        if self.uri.is_none() && !self.has_params() {
            self.uri = fetch(env.uri);
        }
        if self.host.is_none() {
            self.host = fetch(env.host);
        }
        if self.port.is_none() {
            self.port = fetch(env.port).and_then(|port| port.parse().ok());
        }
        if self.user.is_none() {
            self.user = fetch(env.user);
        }
        if self.database.is_none() {
            self.database = fetch(env.database);
        }
    }

    /// Fills host, port and user from the profile's defaults (no-op for URIs).
    pub fn apply_profile_defaults(&mut self, profile: &DialectProfile) {
        if self.uri.is_some() {
            return;
        }
        let defaults = &profile.defaults;
        if self.user.is_none() {
            self.user = defaults.user.map(String::from);
        }
        if self.host.is_none() {
            self.host = defaults.host.map(String::from);
        }
        if self.port.is_none() {
            self.port = defaults.port;
        }
    }

    /// Converts into the target handed to the gateway. A URI wins.
    pub fn to_target(&self) -> ConnectionTarget {
        match &self.uri {
            Some(uri) => ConnectionTarget::Uri(uri.clone()),
            None => ConnectionTarget::Params(ConnectionParams {
                host: self.host.clone(),
                port: self.port,
                user: self.user.clone(),
                database: self.database.clone(),
            }),
        }
    }

    /// Returns a display-safe string (no password) for logging.
    pub fn display_string(&self) -> String {
        self.to_target().display_string()
    }

    fn has_params(&self) -> bool {
        self.host.is_some() || self.port.is_some() || self.user.is_some() || self.database.is_some()
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("safe-query")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file is an empty config.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            GatewayError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a named connection, or the default connection if name is None.
    pub fn get_connection(&self, name: Option<&str>) -> Option<&ConnectionConfig> {
        let key = name.unwrap_or("default");
        self.connections.get(key)
    }

    /// Resolves the gateway config and connection target.
    ///
    /// Precedence: `overrides` (CLI) > named connection > `default`
    /// connection > environment > profile defaults.
    pub fn resolve(
        &self,
        overrides: &ConnectionConfig,
        name: Option<&str>,
        timeout_override: Option<u64>,
    ) -> Result<(GatewayConfig, ConnectionTarget)> {
        self.resolve_with(overrides, name, timeout_override, |key| {
            std::env::var(key).ok()
        })
    }

    /// Same as [`Config::resolve`], reading the environment through `lookup`.
    pub fn resolve_with(
        &self,
        overrides: &ConnectionConfig,
        name: Option<&str>,
        timeout_override: Option<u64>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(GatewayConfig, ConnectionTarget)> {
        let mut connection = self.get_connection(None).cloned().unwrap_or_default();
        if let Some(name) = name {
            let named = self.get_connection(Some(name)).ok_or_else(|| {
                GatewayError::config(format!("Connection '{name}' not found in config file"))
            })?;
            connection.merge(named);
        }
        connection.merge(overrides);

        let dialect = connection.dialect.or(self.dialect).ok_or_else(|| {
            GatewayError::config(
                "No dialect configured. Pass --dialect (mysql, mariadb or postgres) or set it in the config file",
            )
        })?;
        let profile = dialect.profile();

        connection.apply_env_with(profile, lookup);
        connection.apply_profile_defaults(profile);

        let gateway = GatewayConfig {
            dialect,
            client_binary: connection.client_binary.clone(),
            invocation_timeout: timeout_override
                .or(self.invocation_timeout_secs)
                .map(Duration::from_secs),
        };

        Ok((gateway, connection.to_target()))
    }
}
