//!
//! Hydromap Server - HTTP API for the building hot-water topology graph
//!
//! This module exports all the components of the Hydromap server.

use std::sync::Arc;

/// API module
pub mod api;

/// Server module
pub mod server;

/// Configuration module
pub mod config;

/// Error module
pub mod error;

// Re-export key types
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::HydromapServer;

/// Run function
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    // Initialize logging
    init_logging(&config);

    // Create dependencies
    let store = create_graph_store(&config).await?;

    // Create and run the server
    let server = HydromapServer::new(config, store);
    server.run().await
}

/// Initialize logging
fn init_logging(config: &ServerConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    // Create filter based on config
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Initialize subscriber
    fmt().with_env_filter(filter).with_target(true).init();
}

/// Create the graph store backend from the configured URL
pub async fn create_graph_store(
    config: &ServerConfig,
) -> ServerResult<Arc<dyn hydromap_store::GraphStore>> {
    if let Some(path) = config.graph_store_url.strip_prefix("file://") {
        tracing::info!(%path, "Using file graph store");
        let store = hydromap_store::FileGraphStore::open(path).await?;
        return Ok(Arc::new(store));
    }

    if config.graph_store_url.starts_with("memory://") {
        // In-memory store for development and testing
        tracing::info!("Using in-memory graph store");
        return Ok(Arc::new(hydromap_store::InMemoryGraphStore::new()));
    }

    Err(ServerError::Config(format!(
        "Unsupported graph store URL: {}",
        config.graph_store_url
    )))
}
