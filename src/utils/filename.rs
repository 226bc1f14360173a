//! Download filename utilities

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static INVALID_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[<>:"/\\|?*\x00-\x1f\x7f]"#).expect("filename pattern is valid")
});

/// Synthesize a download filename: `<prefix>_<unix millis>.<ext>`
pub fn default_filename(prefix: &str, extension: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}.{}", prefix, now.timestamp_millis(), extension)
}

/// Make a caller-supplied filename safe to embed in a quoted header parameter
pub fn to_safe_filename(filename: &str) -> String {
    let mut safe = INVALID_CHARS.replace_all(filename, "_").to_string();

    safe = safe
        .trim_matches(|c: char| c == '.' || c == ' ')
        .to_string();

    // Limit length, keeping char boundaries intact
    if safe.chars().count() > 200 {
        safe = safe.chars().take(200).collect::<String>().trim_end().to_string();
    }

    safe
}

/// Build the `Content-Disposition` value forcing a download
pub fn attachment_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}
