//! Error handling for the Hydromap Server API
//!
//! Every error response carries a `detail` message and the status code from
//! the error taxonomy: missing resources are 404, duplicate ids and
//! malformed input are 400, everything else is 500.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::error::ServerError;

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        api_error_response(&self)
    }
}

/// Convert a server error into the standard `{"detail": ...}` response
pub fn api_error_response(err: &ServerError) -> axum::response::Response {
    let status = match err {
        ServerError::NotFound(_) => StatusCode::NOT_FOUND,
        ServerError::Conflict(_) | ServerError::MalformedInput(_) => StatusCode::BAD_REQUEST,
        ServerError::Config(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(json!({ "detail": err.to_string() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_the_taxonomy() {
        let cases = [
            (ServerError::NotFound("Node not found".into()), StatusCode::NOT_FOUND),
            (ServerError::Conflict("Node ID already exists".into()), StatusCode::BAD_REQUEST),
            (ServerError::MalformedInput("Invalid YAML".into()), StatusCode::BAD_REQUEST),
            (ServerError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let response = api_error_response(&err);
            assert_eq!(response.status(), expected);
        }
    }
}
