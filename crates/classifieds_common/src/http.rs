//! HTTP plumbing: the JSON error body and the outbound client builder.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{ClassifiedsError, HttpStatusCode};

pub mod client;

/// Errors answer as `{"error": {"message", "code"}}` with the matching status.
impl IntoResponse for ClassifiedsError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "code": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}
