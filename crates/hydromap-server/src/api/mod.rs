//! API module for the Hydromap Server
//!
//! This module contains the API routes and handlers for the Hydromap
//! server.

use axum::{
    http::HeaderValue,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod errors;
pub mod graph;
pub mod health;
pub mod import;

use crate::server::HydromapServer;

/// Build the router for API endpoints
pub fn build_router(server: Arc<HydromapServer>) -> Router {
    let origins: Vec<HeaderValue> = server
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::any())
        .allow_headers(AllowHeaders::any());

    Router::new()
        // Service banner and health check
        .route("/", get(health::root_info))
        .route("/health", get(health::health_check))
        // Whole-graph operations
        .route(
            "/api/graph",
            get(graph::get_graph_handler).post(graph::update_graph_handler),
        )
        // Node CRUD
        .route(
            "/api/nodes",
            get(graph::list_nodes_handler).post(graph::create_node_handler),
        )
        .route(
            "/api/nodes/:node_id",
            get(graph::get_node_handler)
                .put(graph::update_node_handler)
                .delete(graph::delete_node_handler),
        )
        // Edge CRUD
        .route(
            "/api/edges",
            get(graph::list_edges_handler).post(graph::create_edge_handler),
        )
        .route("/api/edges/:edge_id", delete(graph::delete_edge_handler))
        // Tree view
        .route("/api/tree", get(graph::tree_handler))
        // YAML import
        .route("/api/import/yaml", axum::routing::post(import::import_yaml_handler))
        .route(
            "/api/import/yaml-file",
            axum::routing::post(import::import_yaml_file_handler),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(server)
}

// Re-export handler modules for easier imports
pub use errors::api_error_response;
