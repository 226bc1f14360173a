//! TikTok lookup through the TikWM API

use crate::core::media::ResolvedMedia;
use crate::error::QuickdlError;
use crate::platform::client::ProviderClient;
use crate::platform::provider::{MediaProvider, ProviderOutcome};
use crate::utils::url::lookup_url;
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Public TikWM lookup endpoint
pub const TIKWM_ENDPOINT: &str = "https://www.tikwm.com/api/";

#[derive(Debug, Deserialize)]
struct TikwmEnvelope {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<TikwmData>,
}

#[derive(Debug, Default, Deserialize)]
struct TikwmData {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<TikwmAuthor>,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    play: Option<String>,
    #[serde(default)]
    download: Option<String>,
    #[serde(default)]
    music: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TikwmAuthor {
    #[serde(default)]
    nickname: Option<String>,
}

impl TikwmData {
    fn into_media(self) -> ResolvedMedia {
        let title = non_empty(self.title).unwrap_or_else(|| "TikTok Video".to_string());
        let mut media = ResolvedMedia::new("TikTok", title);

        if let Some(nickname) = self.author.and_then(|a| non_empty(a.nickname)) {
            media.author = nickname;
        }
        media.cover = non_empty(self.cover);
        media.video = non_empty(self.play).or_else(|| non_empty(self.download));
        media.music = non_empty(self.music);
        media
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// TikTok-specialized provider
pub struct TikwmProvider {
    client: Arc<ProviderClient>,
    endpoint: String,
}

impl TikwmProvider {
    /// Create a provider against the given lookup endpoint
    pub fn new(client: Arc<ProviderClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Lookup endpoint in use
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn lookup(&self, url: &str) -> Result<ResolvedMedia, QuickdlError> {
        let request_url = lookup_url(&self.endpoint, url)?;
        debug!("Querying TikWM: {}", request_url);

        let request = self
            .client
            .create_json_request(Method::GET, request_url.as_str());
        let response = self.client.send(request).await?.error_for_status()?;
        let envelope: TikwmEnvelope = response.json().await?;

        let data = envelope.data.ok_or_else(|| {
            QuickdlError::Generic(format!(
                "TikWM returned no data{}",
                envelope
                    .msg
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            ))
        })?;

        let media = data.into_media();
        if !media.has_video() {
            return Err(QuickdlError::Generic(
                "TikWM returned no playable video".to_string(),
            ));
        }
        Ok(media)
    }
}

#[async_trait]
impl MediaProvider for TikwmProvider {
    type Output = ResolvedMedia;

    fn name(&self) -> &str {
        "tikwm"
    }

    async fn fetch(&self, url: &str) -> ProviderOutcome<ResolvedMedia> {
        match self.lookup(url).await {
            Ok(media) => {
                info!("TikWM resolved \"{}\" by {}", media.title, media.author);
                ProviderOutcome::Found(media)
            }
            Err(e) => ProviderOutcome::TryNext(e.to_string()),
        }
    }
}
