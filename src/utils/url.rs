//! URL utilities for classifying social-media links and building upstream endpoints

use crate::core::media::Platform;
use crate::error::QuickdlError;
use url::Url;

/// Domain fragments per platform, checked in order
const PLATFORM_RULES: &[(Platform, &[&str])] = &[
    (Platform::TikTok, &["tiktok.com", "vm.tiktok.com"]),
    (Platform::Instagram, &["instagram.com", "instagr.am"]),
    (Platform::Facebook, &["facebook.com", "fb.watch"]),
    (Platform::YouTube, &["youtube.com", "youtu.be"]),
];

/// Classify a URL by case-insensitive substring match; first rule wins
pub fn detect_platform(url: &str) -> Platform {
    let lowered = url.to_lowercase();

    PLATFORM_RULES
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|f| lowered.contains(f)))
        .map(|(platform, _)| *platform)
        .unwrap_or(Platform::Unsupported)
}

/// Trim a user-supplied URL, rejecting blank input
pub fn normalize_input(url: &str) -> Result<&str, QuickdlError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(QuickdlError::InvalidInput("URL is empty".to_string()));
    }
    Ok(trimmed)
}

/// Build the JSON API endpoint of a resolver mirror
pub fn mirror_api_url(mirror: &str) -> String {
    format!("{}/api/json", mirror.trim_end_matches('/'))
}

/// Build a lookup URL carrying the target as the `url` query parameter
pub fn lookup_url(endpoint: &str, target: &str) -> Result<Url, QuickdlError> {
    let mut parsed = Url::parse(endpoint)?;
    parsed.query_pairs_mut().append_pair("url", target);
    Ok(parsed)
}

/// Check if the string looks like an absolute http(s) URL
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http")
}
