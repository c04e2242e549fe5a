//! Handlers for the YAML import endpoints
//!
//! Both endpoints replace the stored graph wholesale with the imported
//! document: one takes a multipart upload, the other a server-local file
//! path.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use hydromap_model::GraphDocument;

use crate::api::errors::api_error_response;
use crate::error::ServerError;
use crate::server::HydromapServer;

/// Query parameters for the server-local file import
#[derive(Debug, Deserialize)]
pub struct ImportFileQuery {
    pub filepath: String,
}

/// Handler for importing an uploaded YAML description
pub async fn import_yaml_handler(
    State(server): State<Arc<HydromapServer>>,
    multipart: Multipart,
) -> impl IntoResponse {
    let yaml = match read_file_field(multipart).await {
        Ok(yaml) => yaml,
        Err(err) => {
            error!(?err, "Rejected YAML upload");
            return api_error_response(&err);
        }
    };

    info!(bytes = yaml.len(), "Importing uploaded building description");

    match server.import_yaml(&yaml).await {
        Ok(graph) => import_response("YAML imported successfully".to_string(), graph),
        Err(err) => {
            error!(?err, "YAML import failed");
            api_error_response(&err)
        }
    }
}

/// Handler for importing a YAML description from a server-local path
pub async fn import_yaml_file_handler(
    State(server): State<Arc<HydromapServer>>,
    Query(query): Query<ImportFileQuery>,
) -> impl IntoResponse {
    info!(filepath = %query.filepath, "Importing building description from file");

    match server.import_yaml_from_path(&query.filepath).await {
        Ok(graph) => import_response(
            format!("YAML imported successfully from {}", query.filepath),
            graph,
        ),
        Err(err) => {
            error!(?err, filepath = %query.filepath, "YAML file import failed");
            api_error_response(&err)
        }
    }
}

/// Pull the uploaded `file` field out of the multipart body
async fn read_file_field(mut multipart: Multipart) -> Result<String, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServerError::MalformedInput(format!("Invalid multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|err| ServerError::MalformedInput(format!("Invalid multipart body: {err}")))?;
        return String::from_utf8(bytes.to_vec()).map_err(|_| {
            ServerError::MalformedInput("Uploaded file is not valid UTF-8".to_string())
        });
    }

    Err(ServerError::MalformedInput(
        "Missing 'file' field in upload".to_string(),
    ))
}

fn import_response(message: String, graph: GraphDocument) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "message": message,
            "nodes_count": graph.nodes.len(),
            "edges_count": graph.edges.len(),
            "graph": graph,
        })),
    )
        .into_response()
}
