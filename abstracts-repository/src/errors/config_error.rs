//! Configuration error types.

use thiserror::Error;

/// Errors raised while reading configuration at startup.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("Missing configuration value: {0}")]
    Missing(String),

    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    /// Create a missing value error.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing(key.into())
    }

    /// Create an invalid value error.
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}
