//! Dependency initialization and wiring for the abstracts indexer.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tracing::info;

use crate::config::IndexerSettings;
use crate::IndexingError;
use abstracts_ingest::{AbstractParser, BulkLoader, IngestOrchestrator};
use abstracts_repository::OpenSearchClient;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: IngestOrchestrator,
    /// Parser over the abstracts dump.
    pub parser: AbstractParser<BufReader<File>>,
}

impl Dependencies {
    /// Initialize all dependencies from the settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the dump cannot be opened or the client cannot be built
    pub async fn new(settings: &IndexerSettings) -> Result<Self, IndexingError> {
        info!(
            abstracts_path = %settings.abstracts_path.display(),
            store_url = %settings.store.url,
            index = %settings.store.index,
            batch_size = settings.loader.batch_size,
            max_batches = settings.loader.max_batches,
            min_summary_size = settings.min_summary_size,
            "Initializing dependencies"
        );

        // Open the dump first so a wrong path fails before any network call
        let parser = AbstractParser::from_path(&settings.abstracts_path, settings.min_summary_size)
            .map_err(|e| {
                IndexingError::config(format!(
                    "Failed to open {}: {}",
                    settings.abstracts_path.display(),
                    e
                ))
            })?;

        let store = OpenSearchClient::new(&settings.store)?;

        let loader = BulkLoader::with_config(Arc::new(store), settings.loader.clone());
        let orchestrator = IngestOrchestrator::with_config(loader, settings.orchestrator.clone());

        Ok(Self {
            orchestrator,
            parser,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use abstracts_repository::StoreError;

    fn settings_for(path: &std::path::Path, url: &str) -> IndexerSettings {
        let path = path.display().to_string();
        let url = url.to_string();
        IndexerSettings::from_lookup(move |key| match key {
            "ABSTRACTS_PATH" => Some(path.clone()),
            "OPENSEARCH_URL" => Some(url.clone()),
            _ => None,
        })
        .unwrap()
    }

    fn dump_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<feed></feed>").unwrap();
        file
    }

    #[tokio::test]
    async fn test_wires_dependencies() {
        let dump = dump_file();
        let settings = settings_for(dump.path(), "http://localhost:9200");

        let mut deps = Dependencies::new(&settings).await.unwrap();

        assert!(deps.parser.next().is_none());
    }

    #[tokio::test]
    async fn test_invalid_store_url_is_store_error() {
        let dump = dump_file();
        let settings = settings_for(dump.path(), "not a url");

        let result = Dependencies::new(&settings).await;

        assert!(matches!(
            result,
            Err(IndexingError::StoreError(StoreError::ConnectionError(_)))
        ));
    }

    #[tokio::test]
    async fn test_missing_dump_fails_before_store() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_for(&dir.path().join("missing.xml"), "not a url");

        let result = Dependencies::new(&settings).await;

        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }
}
