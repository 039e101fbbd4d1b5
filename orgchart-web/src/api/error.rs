//! Core error to HTTP response mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use orgchart_common::Error;
use serde_json::json;
use tracing::error;

/// Handler error wrapping the core taxonomy
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Error::ReassignmentRequired { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self.0 {
            Error::ReassignmentRequired {
                ref name,
                ref subordinates,
            } => json!({
                "error": self.0.to_string(),
                "name": name,
                "subordinates": subordinates,
            }),
            ref e => {
                if status.is_server_error() {
                    error!("Request failed: {}", e);
                }
                json!({ "error": e.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}
