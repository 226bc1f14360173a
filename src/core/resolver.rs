//! Resolution orchestrator

use crate::core::media::{Platform, ResolveMeta, ResolvedMedia};
use crate::error::QuickdlError;
use crate::platform::cobalt::{CobaltProvider, MirrorHit, MirrorPreferences, DEFAULT_MIRRORS};
use crate::platform::formats::pick_best_url;
use crate::platform::tikwm::{TikwmProvider, TIKWM_ENDPOINT};
use crate::platform::{HttpClientConfig, MediaProvider, ProviderClient, ProviderOutcome};
use crate::utils::url::{detect_platform, normalize_input};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Resolver configuration, fixed for the lifetime of the service
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// TikWM lookup endpoint
    pub tiktok_endpoint: String,
    /// Cobalt mirrors, tried in order
    pub mirrors: Vec<String>,
    /// Rendition preferences sent to mirrors
    pub preferences: MirrorPreferences,
    /// Timeout for each metadata lookup
    pub lookup_timeout: Duration,
    /// Timeout for the streaming proxy to obtain a response
    pub stream_timeout: Duration,
    /// User agent for upstream requests
    pub user_agent: String,
    /// Prefix of synthesized download filenames
    pub filename_prefix: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            tiktok_endpoint: TIKWM_ENDPOINT.to_string(),
            mirrors: DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect(),
            preferences: MirrorPreferences::default(),
            lookup_timeout: Duration::from_secs(15),
            stream_timeout: Duration::from_secs(30),
            user_agent: crate::platform::client::DEFAULT_USER_AGENT.to_string(),
            filename_prefix: "quickdl".to_string(),
        }
    }
}

impl ResolverOptions {
    /// Set the TikWM endpoint
    pub fn with_tiktok_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.tiktok_endpoint = endpoint.into();
        self
    }

    /// Replace the mirror list
    pub fn with_mirrors(mut self, mirrors: Vec<String>) -> Self {
        self.mirrors = mirrors;
        self
    }

    /// Set the lookup timeout
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Set the streaming timeout
    pub fn with_stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = timeout;
        self
    }

    /// Set the upstream user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the download filename prefix
    pub fn with_filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }

    /// HTTP configuration for metadata lookups
    pub fn lookup_http_config(&self) -> HttpClientConfig {
        HttpClientConfig::for_lookups(self.lookup_timeout, &self.user_agent)
    }

    /// HTTP configuration for media fetches
    pub fn media_http_config(&self) -> HttpClientConfig {
        HttpClientConfig::for_media(self.stream_timeout, &self.user_agent)
    }
}

type SpecializedProvider = Arc<dyn MediaProvider<Output = ResolvedMedia>>;
type GenericProvider = Arc<dyn MediaProvider<Output = MirrorHit>>;

/// Turns a page URL into a [`ResolvedMedia`] record.
///
/// TikTok links go to the specialized provider first; everything else, and
/// TikTok links that provider could not handle, goes through the mirrors.
/// Both tiers run strictly one after the other.
#[derive(Clone)]
pub struct Resolver {
    specialized: SpecializedProvider,
    generic: GenericProvider,
}

impl Resolver {
    /// Build a resolver with the real upstream providers
    pub fn new(options: &ResolverOptions) -> Result<Self, QuickdlError> {
        let client = Arc::new(ProviderClient::with_config(options.lookup_http_config())?);

        let specialized = TikwmProvider::new(client.clone(), options.tiktok_endpoint.clone());
        let generic = CobaltProvider::new(client, options.mirrors.clone())
            .with_preferences(options.preferences.clone());
        info!(
            "TikTok lookups via {}, {} fallback mirror(s): {}",
            specialized.endpoint(),
            generic.mirrors().len(),
            generic.mirrors().join(", ")
        );

        Ok(Self::with_providers(Arc::new(specialized), Arc::new(generic)))
    }

    /// Build a resolver over arbitrary providers
    pub fn with_providers(specialized: SpecializedProvider, generic: GenericProvider) -> Self {
        Self {
            specialized,
            generic,
        }
    }

    /// Resolve a user-supplied URL
    pub async fn resolve(&self, input: &str) -> Result<ResolvedMedia, QuickdlError> {
        let url = normalize_input(input)?;

        let platform = detect_platform(url);
        if !platform.is_supported() {
            info!("Rejecting unsupported URL: {}", url);
            return Err(QuickdlError::UnsupportedPlatform);
        }
        info!("Resolving {} URL: {}", platform, url);

        if platform == Platform::TikTok {
            match self.specialized.fetch(url).await {
                ProviderOutcome::Found(media) => return Ok(media),
                ProviderOutcome::TryNext(reason) => {
                    warn!(
                        "{} lookup failed, falling back to {}: {}",
                        self.specialized.name(),
                        self.generic.name(),
                        reason
                    );
                }
                ProviderOutcome::Fatal(e) => return Err(e),
            }
        }

        let hit = self
            .generic
            .fetch(url)
            .await
            .into_result(|reason| QuickdlError::UpstreamUnavailable {
                attempts: 1,
                last_error: Some(reason),
            })
            .inspect_err(|e| error!("{} fallback failed: {}", self.generic.name(), e))?;

        let video = pick_best_url(&hit.payload).ok_or_else(|| {
            warn!("Mirror {} answered without a usable URL", hit.server);
            QuickdlError::NoDownloadableUrl
        })?;

        Ok(generic_media(platform, hit, video))
    }
}

fn generic_media(platform: Platform, hit: MirrorHit, video: String) -> ResolvedMedia {
    let name = platform.display_name();
    let MirrorHit { server, payload } = hit;

    let title = payload
        .filename
        .unwrap_or_else(|| format!("{} Video", name));
    let mut media = ResolvedMedia::new(name, title);

    if let Some(author) = payload.author {
        media.author = author;
    }
    media.cover = payload.cover;
    media.video = Some(video);
    media.meta = Some(ResolveMeta {
        resolver_server: server,
    });
    media
}
