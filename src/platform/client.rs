//! HTTP client shared by the upstream providers and the streaming proxy

use crate::error::QuickdlError;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

/// Browser-like user agent sent to media hosts
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout; `None` leaves the body read unbounded
    pub timeout: Option<Duration>,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Transparently decode gzip/brotli bodies
    pub decompress: bool,
    /// Force HTTP/1.1 only (disable HTTP/2)
    pub http1_only: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(15)),
            connect_timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            decompress: true,
            http1_only: false,
        }
    }
}

impl HttpClientConfig {
    /// Configuration for metadata lookups against provider APIs
    pub fn for_lookups(timeout: Duration, user_agent: &str) -> Self {
        Self {
            timeout: Some(timeout),
            connect_timeout: timeout,
            user_agent: user_agent.to_string(),
            ..Default::default()
        }
    }

    /// Configuration for media fetches: bytes pass through undecoded and the
    /// body read is not bounded, only the wait for the response head is.
    pub fn for_media(response_timeout: Duration, user_agent: &str) -> Self {
        Self {
            timeout: None,
            connect_timeout: response_timeout,
            user_agent: user_agent.to_string(),
            decompress: false,
            http1_only: true,
        }
    }
}

/// Thin wrapper over `reqwest::Client` that knows the headers each upstream expects
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: Client,
    config: HttpClientConfig,
}

impl ProviderClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self, QuickdlError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self, QuickdlError> {
        let mut builder = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone());

        if !config.decompress {
            builder = builder.no_gzip().no_brotli();
        }

        if config.http1_only {
            builder = builder.http1_only();
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Create a request against a JSON API
    pub fn create_json_request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");

        match self.config.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Create a plain GET for a media file
    pub fn create_media_request(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("User-Agent", self.config.user_agent.as_str())
            .header("Accept", "*/*")
            .header("Accept-Encoding", "identity");

        match self.config.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Send a request, reporting timeouts separately from other transport errors
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, QuickdlError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                QuickdlError::TimeoutError(e.to_string())
            } else {
                QuickdlError::HttpError(e)
            }
        })?;

        debug!(
            "Upstream {} answered with status {}",
            response.url(),
            response.status()
        );
        Ok(response)
    }
}
