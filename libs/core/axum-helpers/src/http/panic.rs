use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::errors::{ErrorCode, ErrorResponse};

/// Turns a handler panic into a logged JSON 500.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(error_code = ErrorCode::InternalError.code(), panic = %detail, "Handler panicked");

    let body = ErrorResponse::new(
        ErrorCode::InternalError,
        ErrorCode::InternalError.default_message(),
    );
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
