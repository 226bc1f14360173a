//! Request handlers for the resolve and stream endpoints

use crate::core::media::{AssetKind, ResolvedMedia, StreamRequest};
use crate::error::QuickdlError;
use crate::server::error::ApiError;
use crate::server::AppState;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use tracing::{error, warn};

#[derive(Debug, Default, Deserialize)]
pub struct ResolveQuery {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub filename: Option<String>,
}

/// `GET /resolve?url=...`
pub async fn resolve_media(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolvedMedia>, ApiError> {
    let url = query.url.unwrap_or_default();

    match state.resolver.resolve(&url).await {
        Ok(media) => Ok(Json(media)),
        Err(e) => {
            if e.is_client_error() {
                warn!("Rejected resolve request: {}", e);
            } else {
                error!("Resolve failed for {}: {}", url, e);
            }
            Err(ApiError::from_resolve(&e))
        }
    }
}

/// `GET /stream?url=...&type=...&filename=...`
pub async fn stream_media(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Result<Response, ApiError> {
    let Some(url) = query.url.filter(|u| !u.trim().is_empty()) else {
        return Err(ApiError::from_stream(&QuickdlError::InvalidInput(
            "missing url".to_string(),
        )));
    };

    let request = StreamRequest::new(url, AssetKind::from_query(query.kind.as_deref()))
        .with_filename(query.filename);

    let media = state.proxy.open(&request).await.map_err(|e| {
        if e.is_proxy_error() {
            warn!("Stream failed for {}: {}", request.media_url, e);
        } else {
            error!("Stream failed for {}: {}", request.media_url, e);
        }
        ApiError::from_stream(&e)
    })?;

    let disposition = HeaderValue::from_bytes(media.disposition().as_bytes()).map_err(|e| {
        error!("Unusable download filename {:?}: {}", media.filename, e);
        ApiError::from_stream(&QuickdlError::Generic(e.to_string()))
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(media.content_type),
    );
    if let Some(length) = media.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }

    Ok((StatusCode::OK, headers, Body::from_stream(media.body)).into_response())
}
