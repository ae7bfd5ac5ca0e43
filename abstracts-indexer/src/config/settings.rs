//! Indexer settings read from the environment.

use std::path::PathBuf;

use abstracts_ingest::{LoaderConfig, OrchestratorConfig};
use abstracts_repository::config::{parse_bool, parse_var};
use abstracts_repository::{ConfigError, StoreConfig};
use abstracts_shared::DEFAULT_MIN_SUMMARY_SIZE;

/// Default location of the decompressed dump.
const DEFAULT_ABSTRACTS_PATH: &str = "./downloads/enwiki-latest-abstract.xml";

/// Everything the indexer needs, read once at startup.
#[derive(Debug, Clone)]
pub struct IndexerSettings {
    /// Path of the XML abstracts dump.
    pub abstracts_path: PathBuf,
    /// Minimum abstract length, in characters.
    pub min_summary_size: usize,
    /// Document store connection.
    pub store: StoreConfig,
    /// Batching and retry settings.
    pub loader: LoaderConfig,
    /// Run-level settings.
    pub orchestrator: OrchestratorConfig,
}

impl IndexerSettings {
    /// Read the settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `ABSTRACTS_PATH`: dump location (default: ./downloads/enwiki-latest-abstract.xml)
    /// - `MIN_SUMMARY_SIZE`: minimum abstract length (default: 100)
    /// - `BATCH_SIZE`: articles per bulk request (default: 100)
    /// - `BATCHES`: maximum number of bulk requests (default: 10000)
    /// - `RETRY_DELAYS_MS`: comma-separated retry delays (default: 1000,5000,30000)
    /// - `CREATE_INDEX`: create the collection when missing (default: true)
    /// - plus the `OPENSEARCH_*` variables read by [`StoreConfig`]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = StoreConfig::from_lookup(&lookup)?;
        let defaults = LoaderConfig::default();

        let batch_size = parse_var(&lookup, "BATCH_SIZE", defaults.batch_size)?;
        if batch_size == 0 {
            return Err(ConfigError::invalid("BATCH_SIZE", "must be at least 1"));
        }

        let retry_delays_ms = match lookup("RETRY_DELAYS_MS") {
            Some(raw) => parse_delays(&raw)?,
            None => defaults.retry_delays_ms,
        };

        Ok(Self {
            abstracts_path: lookup("ABSTRACTS_PATH")
                .unwrap_or_else(|| DEFAULT_ABSTRACTS_PATH.to_string())
                .into(),
            min_summary_size: parse_var(&lookup, "MIN_SUMMARY_SIZE", DEFAULT_MIN_SUMMARY_SIZE)?,
            store,
            loader: LoaderConfig {
                batch_size,
                max_batches: parse_var(&lookup, "BATCHES", defaults.max_batches)?,
                retry_delays_ms,
            },
            orchestrator: OrchestratorConfig {
                create_index: parse_bool(&lookup, "CREATE_INDEX", true)?,
            },
        })
    }
}

/// Parse `1000,5000,30000`. An empty value disables retries.
fn parse_delays(raw: &str) -> Result<Vec<u64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .map_err(|e| ConfigError::invalid("RETRY_DELAYS_MS", format!("'{}': {}", part, e)))
        })
        .collect()
}
