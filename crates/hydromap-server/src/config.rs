//! Configuration for the Hydromap server
//!
//! This module contains the configuration types and loading functionality.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host to bind to
    #[serde(default = "default_host")]
    pub bind_address: String,

    /// URL of the graph store ("file://<path>" or "memory://<name>")
    #[serde(default = "default_graph_store_url")]
    pub graph_store_url: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Origins allowed by the CORS layer
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_port() -> u16 {
    8000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_graph_store_url() -> String {
    "file://graph_data.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:5174".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn load() -> ServerResult<Self> {
        // Start with defaults
        let mut config = Self::default();

        // Override from environment variables
        if let Ok(port) = env::var("SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.port = port;
            } else {
                warn!("Invalid SERVER_PORT value: {}", port);
            }
        }

        if let Ok(host) = env::var("SERVER_HOST") {
            config.bind_address = host;
        }

        if let Ok(graph_store_url) = env::var("GRAPH_STORE_URL") {
            config.graph_store_url = graph_store_url;
        }

        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.log_level = log_level;
        }

        if let Ok(origins) = env::var("CORS_ORIGINS") {
            if !origins.is_empty() {
                config.cors_origins = origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect();
            }
        }

        // Validate required fields
        if config.graph_store_url.is_empty() {
            return Err(ServerError::Config(
                "Graph store URL is required".to_string(),
            ));
        }

        info!("Loaded server configuration");
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_host(),
            graph_store_url: default_graph_store_url(),
            log_level: default_log_level(),
            cors_origins: default_cors_origins(),
        }
    }
}
