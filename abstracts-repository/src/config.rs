//! Configuration for the document store connection.
//!
//! Values are read once at process start. Readers take a lookup function so
//! that callers can pass `std::env::var` in production and a map in tests.

use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;

/// Default store URL.
pub const DEFAULT_STORE_URL: &str = "http://localhost:9200";

/// Default name of the collection holding the articles.
pub const DEFAULT_INDEX_NAME: &str = "articles";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store (e.g. `https://elastic:9200`).
    pub url: String,
    /// Basic-auth user name. No credentials are sent when unset.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Skip TLS certificate verification.
    ///
    /// Off by default. Only meant for deployments where the store sits behind a
    /// self-signed certificate inside a trusted network.
    pub accept_invalid_certs: bool,
    /// Target collection for reads and writes.
    pub index: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STORE_URL.to_string(),
            username: None,
            password: None,
            accept_invalid_certs: false,
            index: DEFAULT_INDEX_NAME.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StoreConfig {
    /// Read the store configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: store URL (default: http://localhost:9200)
    /// - `OPENSEARCH_USERNAME` / `OPENSEARCH_PASSWORD`: basic-auth credentials
    /// - `OPENSEARCH_ACCEPT_INVALID_CERTS`: disable certificate verification (default: false)
    /// - `OPENSEARCH_INDEX`: target collection (default: articles)
    /// - `OPENSEARCH_TIMEOUT_SECS`: request timeout (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the store configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let username = lookup("OPENSEARCH_USERNAME").filter(|v| !v.is_empty());
        let password = lookup("OPENSEARCH_PASSWORD");
        if username.is_some() && password.is_none() {
            return Err(ConfigError::missing("OPENSEARCH_PASSWORD"));
        }

        let timeout_secs = parse_var(&lookup, "OPENSEARCH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            url: lookup("OPENSEARCH_URL").unwrap_or(defaults.url),
            username,
            password,
            accept_invalid_certs: parse_bool(&lookup, "OPENSEARCH_ACCEPT_INVALID_CERTS", false)?,
            index: lookup("OPENSEARCH_INDEX").unwrap_or(defaults.index),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Basic-auth credentials, if both parts are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

/// Parse an optional variable, falling back to `default` when it is unset.
pub fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, e.to_string())),
        None => Ok(default),
    }
}

/// Parse an optional boolean flag. Accepts `true/false`, `1/0`, `yes/no`.
pub fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::invalid(key, format!("expected a boolean, got '{}'", other))),
        },
        None => Ok(default),
    }
}
