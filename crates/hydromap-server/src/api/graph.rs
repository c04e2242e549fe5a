//! Handlers for the graph, node, edge, and tree endpoints
//!
//! Every handler is a thin wrapper: extract the request, call the matching
//! server operation, wrap the result in the response envelope the frontend
//! expects.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{error, info};

use hydromap_model::{Edge, GraphDocument, Node, Position};

use crate::api::errors::api_error_response;
use crate::server::HydromapServer;

/// Partial node update. Absent fields leave the node untouched.
#[derive(Debug, Default, Deserialize)]
pub struct NodeUpdate {
    /// New category tag
    #[serde(rename = "type", default)]
    pub node_type: Option<String>,

    /// New canvas position
    #[serde(default)]
    pub position: Option<Position>,

    /// Properties merged into the node's existing properties
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// Handler for fetching the whole graph
pub async fn get_graph_handler(State(server): State<Arc<HydromapServer>>) -> impl IntoResponse {
    match server.get_graph().await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(err) => {
            error!(?err, "Failed to load graph");
            api_error_response(&err)
        }
    }
}

/// Handler for replacing the whole graph
pub async fn update_graph_handler(
    State(server): State<Arc<HydromapServer>>,
    Json(document): Json<GraphDocument>,
) -> impl IntoResponse {
    info!(
        nodes = document.nodes.len(),
        edges = document.edges.len(),
        "Replacing graph"
    );

    match server.replace_graph(document).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Graph updated successfully" })),
        )
            .into_response(),
        Err(err) => {
            error!(?err, "Failed to replace graph");
            api_error_response(&err)
        }
    }
}

/// Handler for listing nodes
pub async fn list_nodes_handler(State(server): State<Arc<HydromapServer>>) -> impl IntoResponse {
    match server.list_nodes().await {
        Ok(nodes) => (StatusCode::OK, Json(json!({ "nodes": nodes }))).into_response(),
        Err(err) => {
            error!(?err, "Failed to list nodes");
            api_error_response(&err)
        }
    }
}

/// Handler for creating a node
pub async fn create_node_handler(
    State(server): State<Arc<HydromapServer>>,
    Json(node): Json<Node>,
) -> impl IntoResponse {
    info!(node_id = %node.id, "Creating node");

    match server.create_node(node).await {
        Ok(node) => (
            StatusCode::OK,
            Json(json!({ "message": "Node created", "node": node })),
        )
            .into_response(),
        Err(err) => {
            error!(?err, "Failed to create node");
            api_error_response(&err)
        }
    }
}

/// Handler for fetching a node by id
pub async fn get_node_handler(
    State(server): State<Arc<HydromapServer>>,
    Path(node_id): Path<String>,
) -> impl IntoResponse {
    match server.get_node(&node_id).await {
        Ok(node) => (StatusCode::OK, Json(node)).into_response(),
        Err(err) => {
            error!(?err, %node_id, "Failed to get node");
            api_error_response(&err)
        }
    }
}

/// Handler for partially updating a node
pub async fn update_node_handler(
    State(server): State<Arc<HydromapServer>>,
    Path(node_id): Path<String>,
    Json(update): Json<NodeUpdate>,
) -> impl IntoResponse {
    info!(%node_id, "Updating node");

    match server.update_node(&node_id, update).await {
        Ok(node) => (
            StatusCode::OK,
            Json(json!({ "message": "Node updated", "node": node })),
        )
            .into_response(),
        Err(err) => {
            error!(?err, %node_id, "Failed to update node");
            api_error_response(&err)
        }
    }
}

/// Handler for deleting a node and its edges
pub async fn delete_node_handler(
    State(server): State<Arc<HydromapServer>>,
    Path(node_id): Path<String>,
) -> impl IntoResponse {
    info!(%node_id, "Deleting node");

    match server.delete_node(&node_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Node deleted", "id": node_id })),
        )
            .into_response(),
        Err(err) => {
            error!(?err, %node_id, "Failed to delete node");
            api_error_response(&err)
        }
    }
}

/// Handler for listing edges
pub async fn list_edges_handler(State(server): State<Arc<HydromapServer>>) -> impl IntoResponse {
    match server.list_edges().await {
        Ok(edges) => (StatusCode::OK, Json(json!({ "edges": edges }))).into_response(),
        Err(err) => {
            error!(?err, "Failed to list edges");
            api_error_response(&err)
        }
    }
}

/// Handler for creating an edge
pub async fn create_edge_handler(
    State(server): State<Arc<HydromapServer>>,
    Json(edge): Json<Edge>,
) -> impl IntoResponse {
    info!(edge_id = %edge.id, source = %edge.source, target = %edge.target, "Creating edge");

    match server.create_edge(edge).await {
        Ok(edge) => (
            StatusCode::OK,
            Json(json!({ "message": "Edge created", "edge": edge })),
        )
            .into_response(),
        Err(err) => {
            error!(?err, "Failed to create edge");
            api_error_response(&err)
        }
    }
}

/// Handler for deleting an edge
pub async fn delete_edge_handler(
    State(server): State<Arc<HydromapServer>>,
    Path(edge_id): Path<String>,
) -> impl IntoResponse {
    info!(%edge_id, "Deleting edge");

    match server.delete_edge(&edge_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Edge deleted", "id": edge_id })),
        )
            .into_response(),
        Err(err) => {
            error!(?err, %edge_id, "Failed to delete edge");
            api_error_response(&err)
        }
    }
}

/// Handler for the tree view
pub async fn tree_handler(State(server): State<Arc<HydromapServer>>) -> impl IntoResponse {
    match server.tree().await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => {
            error!(?err, "Failed to build tree");
            api_error_response(&err)
        }
    }
}
