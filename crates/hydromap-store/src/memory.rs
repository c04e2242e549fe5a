//! In-memory implementation of GraphStore
//!
//! This implementation is primarily intended for testing and development
//! purposes. All data is lost when the instance is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{GraphStore, StoreResult};
use hydromap_model::GraphDocument;

/// Keeps the document in process memory.
///
/// Clones share the same underlying document, mirroring how a file-backed
/// store shares the file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphStore {
    document: Arc<RwLock<GraphDocument>>,
}

impl InMemoryGraphStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a document.
    pub fn with_document(document: GraphDocument) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
        }
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn load(&self) -> StoreResult<GraphDocument> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &GraphDocument) -> StoreResult<()> {
        *self.document.write().await = document.clone();
        Ok(())
    }
}
