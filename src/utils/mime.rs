//! MIME type utilities for proxied media

/// Get MIME type from file extension
pub fn mime_from_ext(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

/// Check if a URL points at an MP4 rendition
pub fn is_mp4_url(url: &str) -> bool {
    url.contains(".mp4")
}
