//! Main Hydromap server implementation
//!
//! This module contains the HydromapServer implementation: one method per
//! API operation, each loading the whole document from the store, mutating
//! an in-memory copy, and persisting it back.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, info};

use hydromap_model::{build_tree, import_building_yaml, Edge, GraphDocument, Node, TreeView};
use hydromap_store::GraphStore;

use crate::api::graph::NodeUpdate;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Main server implementation
#[derive(Clone)]
pub struct HydromapServer {
    /// Configuration
    pub config: ServerConfig,

    /// Graph store backend
    store: Arc<dyn GraphStore>,

    /// Serializes read-modify-write cycles against the store. Readers skip
    /// it; concurrent writers take it in request order.
    write_lock: Arc<Mutex<()>>,
}

/// Manual Debug implementation that doesn't try to debug the trait object
impl std::fmt::Debug for HydromapServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HydromapServer")
            .field("config", &self.config)
            .finish()
    }
}

impl HydromapServer {
    /// Create a new HydromapServer
    pub fn new(config: ServerConfig, store: Arc<dyn GraphStore>) -> Self {
        Self {
            config,
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run the server
    pub async fn run(self) -> ServerResult<()> {
        info!("Starting Hydromap server");

        // Build the API router
        let app = crate::api::build_router(Arc::new(self.clone()));

        // Create and bind the TCP listener
        let addr = format!("{}:{}", self.config.bind_address, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        info!("Listening on {}", listener.local_addr()?);

        // Run the server
        axum::serve(listener, app)
            .await
            .map_err(|err| ServerError::Internal(format!("Server error: {err}")))?;

        Ok(())
    }

    /// Fetch the whole graph document.
    pub async fn get_graph(&self) -> ServerResult<GraphDocument> {
        Ok(self.store.load().await?)
    }

    /// Replace the whole graph document.
    pub async fn replace_graph(&self, document: GraphDocument) -> ServerResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.save(&document).await?;
        Ok(())
    }

    /// List all nodes.
    pub async fn list_nodes(&self) -> ServerResult<Vec<Node>> {
        Ok(self.store.load().await?.nodes)
    }

    /// Create a node. Fails if the id already exists.
    pub async fn create_node(&self, node: Node) -> ServerResult<Node> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;

        if document.find_node(&node.id).is_some() {
            return Err(ServerError::Conflict("Node ID already exists".to_string()));
        }

        document.nodes.push(node.clone());
        self.store.save(&document).await?;

        Ok(node)
    }

    /// Fetch a node by id.
    pub async fn get_node(&self, node_id: &str) -> ServerResult<Node> {
        let document = self.store.load().await?;
        document
            .find_node(node_id)
            .cloned()
            .ok_or_else(|| ServerError::NotFound("Node not found".to_string()))
    }

    /// Apply a partial update to a node: `type` replaced when given,
    /// `position` replaced when given, `properties` merged key-by-key.
    pub async fn update_node(&self, node_id: &str, update: NodeUpdate) -> ServerResult<Node> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;

        let node = document
            .find_node_mut(node_id)
            .ok_or_else(|| ServerError::NotFound("Node not found".to_string()))?;

        if let Some(node_type) = update.node_type {
            node.node_type = node_type;
        }
        if let Some(position) = update.position {
            node.position = Some(position);
        }
        if let Some(properties) = update.properties {
            for (key, value) in properties {
                node.properties.insert(key, value);
            }
        }
        let updated = node.clone();

        self.store.save(&document).await?;
        Ok(updated)
    }

    /// Delete a node and every edge touching it as source or target.
    pub async fn delete_node(&self, node_id: &str) -> ServerResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;

        let index = document
            .find_node_index(node_id)
            .ok_or_else(|| ServerError::NotFound("Node not found".to_string()))?;

        document.nodes.remove(index);
        document
            .edges
            .retain(|edge| edge.source != node_id && edge.target != node_id);

        self.store.save(&document).await?;
        Ok(())
    }

    /// List all edges.
    pub async fn list_edges(&self) -> ServerResult<Vec<Edge>> {
        Ok(self.store.load().await?.edges)
    }

    /// Create an edge. Both endpoints must exist and the id must be new;
    /// nothing is persisted when any check fails.
    pub async fn create_edge(&self, edge: Edge) -> ServerResult<Edge> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;

        if document.find_node(&edge.source).is_none() {
            return Err(ServerError::NotFound(format!(
                "Source node {} not found",
                edge.source
            )));
        }
        if document.find_node(&edge.target).is_none() {
            return Err(ServerError::NotFound(format!(
                "Target node {} not found",
                edge.target
            )));
        }
        if document.find_edge_index(&edge.id).is_some() {
            return Err(ServerError::Conflict("Edge ID already exists".to_string()));
        }

        document.edges.push(edge.clone());
        self.store.save(&document).await?;

        Ok(edge)
    }

    /// Delete an edge by id.
    pub async fn delete_edge(&self, edge_id: &str) -> ServerResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;

        let index = document
            .find_edge_index(edge_id)
            .ok_or_else(|| ServerError::NotFound("Edge not found".to_string()))?;

        document.edges.remove(index);
        self.store.save(&document).await?;
        Ok(())
    }

    /// Assemble the tree view of the stored graph.
    pub async fn tree(&self) -> ServerResult<TreeView> {
        let document = self.store.load().await?;
        Ok(build_tree(&document))
    }

    /// Import a YAML building description, replacing the stored graph.
    pub async fn import_yaml(&self, yaml: &str) -> ServerResult<GraphDocument> {
        let document = import_building_yaml(yaml)?;
        debug!(
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "Imported building description"
        );

        let _guard = self.write_lock.lock().await;
        self.store.save(&document).await?;
        Ok(document)
    }

    /// Import a YAML building description from a server-local file path.
    pub async fn import_yaml_from_path(&self, filepath: &str) -> ServerResult<GraphDocument> {
        if !tokio::fs::try_exists(filepath).await.unwrap_or(false) {
            return Err(ServerError::NotFound(format!("File not found: {filepath}")));
        }

        let yaml = tokio::fs::read_to_string(filepath).await?;
        self.import_yaml(&yaml).await
    }
}
