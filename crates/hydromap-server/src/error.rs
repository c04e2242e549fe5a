//! Error types for the Hydromap server
//!
//! This module contains the error types used throughout the server.

use thiserror::Error;

use hydromap_model::ImportError;
use hydromap_store::StoreError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// Resource not found (missing node, edge, or file)
    #[error("{0}")]
    NotFound(String),

    /// Duplicate id on creation
    #[error("{0}")]
    Conflict(String),

    /// Invalid YAML or a document without the required structure
    #[error("{0}")]
    MalformedInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("{0}")]
    Internal(String),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

// Implement conversions from other error types
impl From<ImportError> for ServerError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Yaml(_) | ImportError::MissingBuilding => {
                ServerError::MalformedInput(err.to_string())
            }
            // The original import path treated anything unexpected as an
            // internal failure; keep that as the typed fallback.
            other => ServerError::Internal(format!("Error processing YAML: {other}")),
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        ServerError::Internal(format!("Graph store error: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}
