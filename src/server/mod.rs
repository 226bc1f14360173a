//! HTTP service exposing resolution and streaming

pub mod error;
pub mod handlers;

use crate::core::resolver::{Resolver, ResolverOptions};
use crate::download::proxy::StreamProxy;
use crate::error::QuickdlError;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use error::ApiError;
pub use handlers::{resolve_media, stream_media};

/// Resolve endpoints; the second path is kept for older clients
pub const RESOLVE_ROUTES: [&str; 2] = ["/resolve", "/api/tiktok"];
/// Stream endpoints; the second path is kept for older clients
pub const STREAM_ROUTES: [&str; 2] = ["/stream", "/api/force-download"];

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub proxy: Arc<StreamProxy>,
}

impl AppState {
    /// Build the real resolver and proxy from service options
    pub fn new(options: &ResolverOptions) -> Result<Self, QuickdlError> {
        Ok(Self {
            resolver: Arc::new(Resolver::new(options)?),
            proxy: Arc::new(StreamProxy::from_options(options)?),
        })
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new();
    for path in RESOLVE_ROUTES {
        router = router.route(path, get(resolve_media));
    }
    for path in STREAM_ROUTES {
        router = router.route(path, get(stream_media));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl+C
pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<(), QuickdlError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
    }
    info!("Shutdown requested, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn options(tiktok: &str, mirrors: Vec<String>) -> ResolverOptions {
        ResolverOptions::default()
            .with_tiktok_endpoint(tiktok)
            .with_mirrors(mirrors)
            .with_lookup_timeout(Duration::from_secs(5))
            .with_stream_timeout(Duration::from_secs(5))
    }

    fn app(options: &ResolverOptions) -> Router {
        router(AppState::new(options).unwrap())
    }

    fn uri(path: &str, params: &[(&str, &str)]) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        format!("{}?{}", path, query)
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_missing_url() {
        let app = app(&options("http://127.0.0.1:9/api/", vec![]));

        let response = get(app.clone(), "/resolve").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Missing url parameter"})
        );

        let response = get(app, &uri("/resolve", &[("url", "   ")])).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resolve_unsupported_platform() {
        let app = app(&options("http://127.0.0.1:9/api/", vec![]));

        let response = get(app, &uri("/resolve", &[("url", "https://vimeo.com/123")])).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Platform not supported"})
        );
    }

    #[tokio::test]
    async fn test_resolve_through_mirror() {
        let mut mirror = mockito::Server::new_async().await;
        mirror
            .mock("POST", "/api/json")
            .with_status(200)
            .with_body(
                json!({
                    "status": "picker",
                    "picker": [{"url": "http://cdn/a.jpg"}, {"url": "http://cdn/b.mp4"}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let app = app(&options("http://127.0.0.1:9/api/", vec![mirror.url()]));
        let response = get(
            app,
            &uri("/resolve", &[("url", "https://www.instagram.com/p/xyz/")]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "platform": "Instagram",
                "title": "Instagram Video",
                "author": "Unknown",
                "cover": null,
                "video": "http://cdn/b.mp4",
                "music": null,
                "_meta": {"resolverServer": mirror.url()}
            })
        );
    }

    #[tokio::test]
    async fn test_tiktok_alias_without_meta() {
        let mut tikwm = mockito::Server::new_async().await;
        tikwm
            .mock("GET", "/api/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"data": {"title": "Clip", "play": "http://cdn/p.mp4"}}).to_string(),
            )
            .create_async()
            .await;

        let app = app(&options(&format!("{}/api/", tikwm.url()), vec![]));
        let response = get(
            app,
            &uri(
                "/api/tiktok",
                &[("url", "https://www.tiktok.com/@a/video/1")],
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["platform"], "TikTok");
        assert_eq!(body["video"], "http://cdn/p.mp4");
        assert!(body.get("_meta").is_none());
    }

    #[tokio::test]
    async fn test_resolve_mirrors_exhausted() {
        let mut mirror = mockito::Server::new_async().await;
        mirror
            .mock("POST", "/api/json")
            .with_status(502)
            .create_async()
            .await;

        let app = app(&options("http://127.0.0.1:9/api/", vec![mirror.url()]));
        let response = get(
            app,
            &uri("/resolve", &[("url", "https://youtu.be/dQw4w9WgXcQ")]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Failed to fetch video. Please try again later."})
        );
    }

    #[tokio::test]
    async fn test_stream_missing_url() {
        let app = app(&options("http://127.0.0.1:9/api/", vec![]));

        let response = get(app, "/stream?type=mp3").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Missing url");
    }

    #[tokio::test]
    async fn test_stream_audio() {
        let mut host = mockito::Server::new_async().await;
        host.mock("GET", "/track")
            .with_status(200)
            .with_body(b"ID3\x04\x00payload".to_vec())
            .create_async()
            .await;

        let app = app(&options("http://127.0.0.1:9/api/", vec![]));
        let media_url = format!("{}/track", host.url());
        let response = get(app, &uri("/stream", &[("url", media_url.as_str()), ("type", "mp3")])).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"quickdl_"));
        assert!(disposition.ends_with(".mp3\""));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ID3\x04\x00payload");
    }

    #[tokio::test]
    async fn test_force_download_alias_with_filename() {
        let mut host = mockito::Server::new_async().await;
        host.mock("GET", "/v.mp4")
            .with_status(200)
            .with_body("video-bytes")
            .create_async()
            .await;

        let app = app(&options("http://127.0.0.1:9/api/", vec![]));
        let media_url = format!("{}/v.mp4", host.url());
        let response = get(
            app,
            &uri(
                "/api/force-download",
                &[("url", media_url.as_str()), ("type", "mp4"), ("filename", "clip.mp4")],
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "video/mp4");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"clip.mp4\""
        );
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "11");
        assert_eq!(body_text(response).await, "video-bytes");
    }

    #[tokio::test]
    async fn test_stream_upstream_failure() {
        let mut host = mockito::Server::new_async().await;
        host.mock("GET", "/missing.mp4")
            .with_status(404)
            .create_async()
            .await;

        let app = app(&options("http://127.0.0.1:9/api/", vec![]));
        let media_url = format!("{}/missing.mp4", host.url());
        let response = get(app, &uri("/stream", &[("url", media_url.as_str())])).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Failed to stream file");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = app(&options("http://127.0.0.1:9/api/", vec![]));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/resolve")
                    .header(header::ORIGIN, "https://example.org")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
