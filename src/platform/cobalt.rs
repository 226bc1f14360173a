//! Generic resolution through community Cobalt mirrors

use crate::error::QuickdlError;
use crate::platform::client::ProviderClient;
use crate::platform::formats::MirrorPayload;
use crate::platform::provider::{MediaProvider, ProviderOutcome};
use crate::utils::url::mirror_api_url;
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Community mirrors tried in order
pub const DEFAULT_MIRRORS: [&str; 3] = [
    "https://cobalt-api.ayo.tf",
    "https://ca.haloz.at",
    "https://cobalt.kwiatekmiki.pl",
];

/// Fixed rendition preferences sent with every mirror request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorPreferences {
    pub video_codec: String,
    pub video_quality: String,
    pub filename_pattern: String,
}

impl Default for MirrorPreferences {
    fn default() -> Self {
        Self {
            video_codec: "h264".to_string(),
            video_quality: "720".to_string(),
            filename_pattern: "basic".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MirrorRequest<'a> {
    url: &'a str,
    v_codec: &'a str,
    v_quality: &'a str,
    filename_pattern: &'a str,
}

/// A usable payload and the mirror that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorHit {
    pub server: String,
    pub payload: MirrorPayload,
}

/// Generic multi-mirror provider
pub struct CobaltProvider {
    client: Arc<ProviderClient>,
    mirrors: Vec<String>,
    preferences: MirrorPreferences,
}

impl CobaltProvider {
    /// Create a provider over an ordered mirror list
    pub fn new(client: Arc<ProviderClient>, mirrors: Vec<String>) -> Self {
        Self {
            client,
            mirrors,
            preferences: MirrorPreferences::default(),
        }
    }

    /// Set rendition preferences
    pub fn with_preferences(mut self, preferences: MirrorPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Configured mirrors, in try order
    pub fn mirrors(&self) -> &[String] {
        &self.mirrors
    }

    /// Ask one mirror; any failure here only disqualifies this mirror
    async fn attempt(&self, mirror: &str, url: &str) -> Result<MirrorPayload, QuickdlError> {
        let body = MirrorRequest {
            url,
            v_codec: &self.preferences.video_codec,
            v_quality: &self.preferences.video_quality,
            filename_pattern: &self.preferences.filename_pattern,
        };

        let request = self
            .client
            .create_json_request(Method::POST, &mirror_api_url(mirror))
            .json(&body);
        let response = self.client.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuickdlError::Generic(format!("HTTP {}", status)));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(QuickdlError::Generic("empty response body".to_string()));
        }

        let value: Value = serde_json::from_str(&text)?;
        if value.is_null() {
            return Err(QuickdlError::Generic("empty response body".to_string()));
        }

        let payload = MirrorPayload::from_value(&value);
        if payload.is_error() {
            return Err(QuickdlError::Generic(format!(
                "mirror reported error: {}",
                payload.text.as_deref().unwrap_or("no details")
            )));
        }

        Ok(payload)
    }
}

#[async_trait]
impl MediaProvider for CobaltProvider {
    type Output = MirrorHit;

    fn name(&self) -> &str {
        "cobalt"
    }

    async fn fetch(&self, url: &str) -> ProviderOutcome<MirrorHit> {
        let mut attempts = 0;
        let mut last_error = None;

        for mirror in &self.mirrors {
            attempts += 1;
            debug!("Trying mirror {} ({}/{})", mirror, attempts, self.mirrors.len());

            match self.attempt(mirror, url).await {
                Ok(payload) => {
                    info!("Mirror {} resolved the request", mirror);
                    return ProviderOutcome::Found(MirrorHit {
                        server: mirror.clone(),
                        payload,
                    });
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Mirror {} failed: {}", mirror, e);
                    last_error = Some(e.to_string());
                }
                Err(e) => return ProviderOutcome::Fatal(e),
            }
        }

        ProviderOutcome::Fatal(QuickdlError::UpstreamUnavailable {
            attempts,
            last_error,
        })
    }
}
