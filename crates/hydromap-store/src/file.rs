//! File-backed graph store: one JSON document on local disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::{GraphStore, StoreResult};
use hydromap_model::GraphDocument;

/// Stores the graph as a single pretty-printed JSON file.
///
/// Opening the store creates the file with empty node/edge arrays when it
/// does not exist yet. Saves replace the whole file.
#[derive(Debug, Clone)]
pub struct FileGraphStore {
    path: PathBuf,
}

impl FileGraphStore {
    /// Open a store at `path`, bootstrapping an empty document if needed.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self { path: path.into() };
        store.ensure_exists().await?;
        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_exists(&self) -> StoreResult<()> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }

        debug!(path = %self.path.display(), "Creating empty graph store file");
        self.write_document(&GraphDocument::default()).await
    }

    async fn write_document(&self, document: &GraphDocument) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl GraphStore for FileGraphStore {
    async fn load(&self) -> StoreResult<GraphDocument> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, document: &GraphDocument) -> StoreResult<()> {
        self.write_document(document).await
    }
}
