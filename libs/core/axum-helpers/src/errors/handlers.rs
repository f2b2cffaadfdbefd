use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Router fallback: JSON 404 for unknown routes.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");
    let body = ErrorResponse::new(
        ErrorCode::NotFound,
        format!("No route for {}", uri.path()),
    );

    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

