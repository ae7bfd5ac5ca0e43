//! Abstracts indexer entry point.
//!
//! Streams the abstracts dump into the search index and exits non-zero on any
//! fatal error.

use std::process::ExitCode;

use tracing::{error, info};

use abstracts_indexer::{Dependencies, IndexerSettings, IndexingError};
use abstracts_shared::telemetry::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing("info");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Ingestion failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), IndexingError> {
    let settings = IndexerSettings::from_env()?;
    let Dependencies {
        orchestrator,
        mut parser,
    } = Dependencies::new(&settings).await?;

    let summary = orchestrator.run(parser.by_ref()).await?;
    let stats = parser.stats();

    info!(
        batches = summary.batches,
        documents = summary.documents,
        retries = summary.retries,
        item_failures = summary.item_failures,
        docs_seen = stats.docs,
        docs_skipped = stats.skipped,
        "Indexer finished"
    );
    Ok(())
}
