//! Media records shared by the resolver, the providers and the proxy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Social-media platform a URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    TikTok,
    Instagram,
    Facebook,
    YouTube,
    Unsupported,
}

impl Platform {
    /// Get all supported platforms, in detection order
    pub fn supported() -> [Platform; 4] {
        [
            Platform::TikTok,
            Platform::Instagram,
            Platform::Facebook,
            Platform::YouTube,
        ]
    }

    /// Lower-case platform tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::TikTok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::YouTube => "youtube",
            Platform::Unsupported => "unsupported",
        }
    }

    /// Display name used by the generic resolution path.
    ///
    /// YouTube keeps its brand casing, every other tag is title-cased
    /// (so TikTok renders as "Tiktok" here).
    pub fn display_name(&self) -> String {
        if *self == Platform::YouTube {
            return "YouTube".to_string();
        }

        let tag = self.as_str();
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Check if the platform can be resolved
    pub fn is_supported(&self) -> bool {
        *self != Platform::Unsupported
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostics attached to a generic-path resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveMeta {
    /// Mirror that satisfied the request
    #[serde(rename = "resolverServer")]
    pub resolver_server: String,
}

/// Normalized result of resolving a page URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMedia {
    /// Human-readable platform name
    pub platform: String,
    /// Media title
    pub title: String,
    /// Author name, "Unknown" when the provider has none
    pub author: String,
    /// Thumbnail URL
    pub cover: Option<String>,
    /// Direct video URL
    pub video: Option<String>,
    /// Direct audio URL (TikTok lookups only)
    pub music: Option<String>,
    /// Which upstream mirror answered
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none", default)]
    pub meta: Option<ResolveMeta>,
}

impl ResolvedMedia {
    /// Default author used when a provider omits it
    pub const UNKNOWN_AUTHOR: &'static str = "Unknown";

    /// Create a record with default author and no optional fields
    pub fn new(platform: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            title: title.into(),
            author: Self::UNKNOWN_AUTHOR.to_string(),
            cover: None,
            video: None,
            music: None,
            meta: None,
        }
    }

    /// Mirror identity, present on the generic path only
    pub fn source_provider(&self) -> Option<&str> {
        self.meta.as_ref().map(|m| m.resolver_server.as_str())
    }

    /// Check if the record carries a playable video URL
    pub fn has_video(&self) -> bool {
        self.video.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// Kind of asset the proxy serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetKind {
    #[default]
    Video,
    Audio,
}

impl AssetKind {
    /// Map the `type` query parameter: only "mp3" selects audio
    pub fn from_query(kind: Option<&str>) -> Self {
        match kind {
            Some("mp3") => AssetKind::Audio,
            _ => AssetKind::Video,
        }
    }

    /// File extension for synthesized filenames
    pub fn extension(&self) -> &'static str {
        match self {
            AssetKind::Video => "mp4",
            AssetKind::Audio => "mp3",
        }
    }

    /// Content type sent to the caller
    pub fn content_type(&self) -> &'static str {
        crate::utils::mime::mime_from_ext(self.extension())
    }
}

/// A request to re-stream an already resolved media URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    /// Directly fetchable media URL
    pub media_url: String,
    /// Video or audio
    pub kind: AssetKind,
    /// Caller-supplied filename
    pub filename: Option<String>,
}

impl StreamRequest {
    /// Create a stream request for a media URL
    pub fn new(media_url: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            media_url: media_url.into(),
            kind,
            filename: None,
        }
    }

    /// Set the download filename; empty names are ignored
    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename.filter(|f| !f.trim().is_empty());
        self
    }
}
