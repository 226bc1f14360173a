//! Error types for quickdl

use thiserror::Error;

/// Main error type for quickdl operations
#[derive(Debug, Error)]
pub enum QuickdlError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Platform not supported")]
    UnsupportedPlatform,

    #[error("All upstream providers failed after {attempts} attempt(s){}", last_error_suffix(.last_error))]
    UpstreamUnavailable {
        attempts: usize,
        last_error: Option<String>,
    },

    #[error("No downloadable URL found")]
    NoDownloadableUrl,

    #[error("Proxy fetch failed: {0}")]
    ProxyFetchFailed(String),

    #[error("Proxy stream interrupted: {0}")]
    ProxyStreamInterrupted(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(err) => format!(" (last error: {})", err),
        None => String::new(),
    }
}

impl QuickdlError {
    /// Check if the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QuickdlError::InvalidInput(_) | QuickdlError::UnsupportedPlatform
        )
    }

    /// Check if a single provider attempt failed in a way the next strategy can recover from
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QuickdlError::HttpError(_)
                | QuickdlError::JsonError(_)
                | QuickdlError::TimeoutError(_)
                | QuickdlError::Generic(_)
        )
    }

    /// Check if the error came from the streaming proxy
    pub fn is_proxy_error(&self) -> bool {
        matches!(
            self,
            QuickdlError::ProxyFetchFailed(_) | QuickdlError::ProxyStreamInterrupted(_)
        )
    }
}
