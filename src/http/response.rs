//! Response construction and error mapping.
//!
//! # Responsibilities
//! - Map bridge errors to HTTP status codes
//! - Render every API error as `{"error": "<message>"}`
//! - Build the fixed static-file and fallback responses
//!
//! # Design Decisions
//! - Downstream success bodies are passed through unmodified
//! - Timeouts result in 504 Gateway Timeout, invalid downstream JSON in
//!   502 Bad Gateway, every other bridge failure in 500

use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::bridge::{BridgeError, ErrorBody};

pub const APPLICATION_JSON: &str = "application/json";

/// Errors surfaced by the conversion endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    BadRequest(#[source] serde_json::Error),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Bridge(BridgeError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Bridge(BridgeError::InvalidResponse(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Bridge(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// 200 with the downstream's bytes, labelled as JSON.
pub fn passthrough_json(payload: Bytes) -> Response {
    ([(header::CONTENT_TYPE, APPLICATION_JSON)], payload).into_response()
}

/// 404 with a plain-text body, used for static misses.
pub fn file_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "File Not Found",
    )
        .into_response()
}

/// 404 with an empty body, used for unmatched method/path combinations.
pub fn empty_not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}
