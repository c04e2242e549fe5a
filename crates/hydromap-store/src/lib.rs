//! Hydromap Graph Store
//!
//! Provides abstractions and implementations for persisting the topology
//! graph document. The GraphStore trait defines a contract for loading and
//! saving the whole document; backends exist for a single JSON file on local
//! disk and for process memory.

use async_trait::async_trait;
use thiserror::Error;

use hydromap_model::GraphDocument;

pub mod file;
pub mod memory;

pub use file::FileGraphStore;
pub use memory::InMemoryGraphStore;

/// Errors from graph store backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying file I/O failure
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document could not be serialized or deserialized
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Contract for loading and saving the whole graph document.
///
/// Every API request operates on the entire document: load, mutate in
/// memory, save. The store itself does not serialize read-modify-write
/// cycles — callers that mutate must hold their own lock across
/// load and save.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Load the current document.
    async fn load(&self) -> StoreResult<GraphDocument>;

    /// Persist the document wholesale, replacing the previous snapshot.
    async fn save(&self, document: &GraphDocument) -> StoreResult<()>;
}
