//! HTTP error responses

use crate::error::QuickdlError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Error returned by a handler, already reduced to its user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// `{"error": message}` body, used by the resolve endpoints
    Json { status: StatusCode, message: String },
    /// Plain text body, used by the stream endpoints
    Text { status: StatusCode, message: String },
}

impl ApiError {
    /// JSON error with the given status
    pub fn json(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Json {
            status,
            message: message.into(),
        }
    }

    /// Plain text error with the given status
    pub fn text(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Text {
            status,
            message: message.into(),
        }
    }

    /// Map a resolution failure. Internal details stay in the logs.
    pub fn from_resolve(err: &QuickdlError) -> Self {
        match err {
            QuickdlError::InvalidInput(_) => {
                Self::json(StatusCode::BAD_REQUEST, "Missing url parameter")
            }
            QuickdlError::UnsupportedPlatform => {
                Self::json(StatusCode::BAD_REQUEST, "Platform not supported")
            }
            QuickdlError::UpstreamUnavailable { .. } => Self::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch video. Please try again later.",
            ),
            QuickdlError::NoDownloadableUrl => Self::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "No downloadable URL found.",
            ),
            _ => Self::json(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }

    /// Map a failure to open an upstream stream
    pub fn from_stream(err: &QuickdlError) -> Self {
        match err {
            QuickdlError::InvalidInput(_) => Self::text(StatusCode::BAD_REQUEST, "Missing url"),
            _ => Self::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to stream file"),
        }
    }

    /// Response status
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Json { status, .. } | ApiError::Text { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Json { status, message } => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Text { status, message } => (status, message).into_response(),
        }
    }
}
