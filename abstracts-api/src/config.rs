//! Configuration for the API server.

use abstracts_repository::config::parse_var;
use abstracts_repository::{ConfigError, StoreConfig};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// API server settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Document store connection.
    pub store: StoreConfig,
}

impl ApiConfig {
    /// Read the settings from the process environment (`API_HOST`, `API_PORT`
    /// and the `OPENSEARCH_*` variables).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_var(&lookup, "API_PORT", DEFAULT_PORT)?,
            store: StoreConfig::from_lookup(&lookup)?,
        })
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
