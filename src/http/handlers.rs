//! Conversion and static-file handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::bridge::ConversionRequest;
use crate::http::response::{self, ApiError};
use crate::http::server::AppState;
use crate::http::static_files::StaticFileError;
use crate::observability::metrics;

/// Path of the conversion endpoint.
pub const CONVERT_PATH: &str = "/convert";

/// `POST /convert`: parse `{"text": ...}` and relay it downstream.
pub async fn convert(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: ConversionRequest = serde_json::from_slice(&body).map_err(ApiError::BadRequest)?;

    tracing::debug!(
        text_len = request.text.len(),
        downstream = %state.bridge.address(),
        "Forwarding conversion"
    );

    let payload = state.bridge.forward(&request.text).await?;
    Ok(response::passthrough_json(payload))
}

/// Fallback: `GET`/`HEAD` are file requests, everything else is a 404.
pub async fn serve_static(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return response::empty_not_found();
    }

    match state.static_files.load(uri.path()).await {
        Ok(file) => {
            metrics::record_static_request(StatusCode::OK.as_u16());
            tracing::debug!(path = %file.path.display(), content_type = file.content_type, "Static file served");
            ([(header::CONTENT_TYPE, file.content_type)], file.content).into_response()
        }
        Err(e) => {
            metrics::record_static_request(StatusCode::NOT_FOUND.as_u16());
            match e {
                StaticFileError::OutsideRoot(_) => {
                    tracing::warn!(path = %uri.path(), error = %e, "Path traversal attempt blocked")
                }
                _ => tracing::debug!(path = %uri.path(), error = %e, "Static file not served"),
            }
            response::file_not_found()
        }
    }
}

/// Non-`POST` methods on the conversion endpoint.
pub async fn method_not_routed() -> Response {
    response::empty_not_found()
}
