//! Abstracts API entry point.

use std::sync::Arc;

use tracing::info;

use abstracts_api::{router, ApiConfig, AppState};
use abstracts_repository::OpenSearchClient;
use abstracts_shared::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    init_tracing("abstracts_api=info,tower_http=info");

    let config = ApiConfig::from_env()?;
    let store = OpenSearchClient::new(&config.store)?;
    let app = router(AppState::new(Arc::new(store)));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Abstracts API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Abstracts API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
