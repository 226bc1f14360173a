//! Streaming proxy that re-serves resolved media as a forced download

use crate::core::media::StreamRequest;
use crate::core::resolver::ResolverOptions;
use crate::error::QuickdlError;
use crate::platform::client::ProviderClient;
use crate::utils::filename::{attachment_disposition, default_filename, to_safe_filename};
use bytes::Bytes;
use chrono::Utc;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tracing::{debug, info, warn};

type UpstreamBody = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// An upstream media response ready to be forwarded
pub struct ProxiedMedia {
    /// Filename announced to the caller
    pub filename: String,
    /// Content type announced to the caller
    pub content_type: &'static str,
    /// Upstream length, when known
    pub content_length: Option<u64>,
    /// Incremental upstream body
    pub body: ProxyStream,
}

impl ProxiedMedia {
    /// `Content-Disposition` header value
    pub fn disposition(&self) -> String {
        attachment_disposition(&self.filename)
    }
}

/// Pass-through byte stream over the upstream body.
///
/// Chunks are pulled from upstream only when the consumer polls, so memory
/// stays bounded to one chunk. Dropping the stream drops the upstream
/// connection.
pub struct ProxyStream {
    inner: UpstreamBody,
    source: String,
    forwarded: u64,
    finished: bool,
}

impl ProxyStream {
    fn new(inner: UpstreamBody, source: String) -> Self {
        Self {
            inner,
            source,
            forwarded: 0,
            finished: false,
        }
    }

    /// Bytes handed to the consumer so far
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }
}

impl Stream for ProxyStream {
    type Item = Result<Bytes, QuickdlError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                self.forwarded += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                self.finished = true;
                warn!(
                    "Upstream stream from {} interrupted after {} bytes: {}",
                    self.source, self.forwarded, e
                );
                Poll::Ready(Some(Err(QuickdlError::ProxyStreamInterrupted(
                    e.to_string(),
                ))))
            }
            Poll::Ready(None) => {
                self.finished = true;
                info!("Streamed {} bytes from {}", self.forwarded, self.source);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ProxyStream {
    fn drop(&mut self) {
        if !self.finished {
            info!(
                "Client left after {} bytes, releasing upstream {}",
                self.forwarded, self.source
            );
        }
    }
}

/// Fetches resolved media URLs and exposes them as download streams
pub struct StreamProxy {
    client: Arc<ProviderClient>,
    response_timeout: Duration,
    filename_prefix: String,
}

impl StreamProxy {
    /// Create a proxy over a media client
    pub fn new(client: Arc<ProviderClient>, response_timeout: Duration) -> Self {
        Self {
            client,
            response_timeout,
            filename_prefix: "quickdl".to_string(),
        }
    }

    /// Create a proxy with its own media client from service options
    pub fn from_options(options: &ResolverOptions) -> Result<Self, QuickdlError> {
        let client = ProviderClient::with_config(options.media_http_config())?;
        Ok(Self::new(Arc::new(client), options.stream_timeout)
            .with_filename_prefix(options.filename_prefix.clone()))
    }

    /// Set the prefix of synthesized filenames
    pub fn with_filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }

    /// Filename for a request: the caller's (made header-safe) or a synthesized one
    pub fn filename_for(&self, request: &StreamRequest) -> String {
        request
            .filename
            .as_deref()
            .map(to_safe_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| {
                default_filename(&self.filename_prefix, request.kind.extension(), Utc::now())
            })
    }

    /// Open the upstream media. Errors here happen before any byte is forwarded.
    pub async fn open(&self, request: &StreamRequest) -> Result<ProxiedMedia, QuickdlError> {
        info!("Proxying {:?} from {}", request.kind, request.media_url);

        let send = self
            .client
            .create_media_request(&request.media_url)
            .send();
        let response = match tokio::time::timeout(self.response_timeout, send).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(QuickdlError::ProxyFetchFailed(e.to_string())),
            Err(_) => {
                return Err(QuickdlError::ProxyFetchFailed(format!(
                    "no response within {:?}",
                    self.response_timeout
                )))
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(QuickdlError::ProxyFetchFailed(format!(
                "upstream returned {}",
                status
            )));
        }

        let content_length = response.content_length();
        debug!(
            "Upstream media ready (status {}, length {:?})",
            status, content_length
        );

        Ok(ProxiedMedia {
            filename: self.filename_for(request),
            content_type: request.kind.content_type(),
            content_length,
            body: ProxyStream::new(
                Box::pin(response.bytes_stream()),
                request.media_url.clone(),
            ),
        })
    }
}
