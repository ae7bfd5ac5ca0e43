//! Error types for the abstracts repository.

mod config_error;
mod store_error;

pub use config_error::ConfigError;
pub use store_error::StoreError;
