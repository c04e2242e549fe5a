//! Health check and service banner endpoints for the Hydromap Server

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::server::HydromapServer;

/// Service banner at `/`
pub async fn root_info() -> impl IntoResponse {
    Json(json!({
        "message": "Hydromap Topology API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check handler
///
/// Reports overall status plus the state of the graph store, which is the
/// only dependency this server has.
pub async fn health_check(State(server): State<Arc<HydromapServer>>) -> impl IntoResponse {
    info!("Health check requested");

    let store_status = match server.get_graph().await {
        Ok(_) => "UP",
        Err(_) => "DOWN",
    };

    let response = json!({
        "status": if store_status == "UP" { "UP" } else { "DOWN" },
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "graphStore": { "status": store_status },
        },
    });

    let overall_status = if store_status == "DOWN" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (overall_status, Json(response))
}
