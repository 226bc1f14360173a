//! Mirror payload parsing and media URL selection
//!
//! Resolver mirrors are not API-stable: the media location may come back as a
//! single `url`, a `picker` list of alternatives, or a `formats` list whose
//! entries are either objects or `[url, ...]` tuples. The raw JSON is
//! classified once into [`MirrorPayload`] and the URL is chosen from its
//! [`MediaLocation`]s in fixed precedence.

use crate::utils::mime::is_mp4_url;
use crate::utils::url::is_http_url;
use serde_json::Value;

/// One alternative rendition in a `picker` list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickerItem {
    pub url: Option<String>,
}

/// One entry in a `formats` list, normalized from object or tuple form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatEntry {
    pub url: Option<String>,
    pub ext: Option<String>,
}

impl FormatEntry {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self {
                url: non_empty_str(value.get("url")),
                ext: non_empty_str(value.get("ext")),
            },
            Value::Array(items) => Self {
                url: non_empty_str(items.first()),
                ext: None,
            },
            _ => Self::default(),
        }
    }

    fn is_mp4(&self) -> bool {
        match &self.url {
            Some(url) => self.ext.as_deref() == Some("mp4") || is_mp4_url(url),
            None => false,
        }
    }
}

/// Normalized view of a mirror's JSON response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MirrorPayload {
    pub status: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
    pub picker: Vec<PickerItem>,
    pub formats: Vec<FormatEntry>,
    pub filename: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
}

/// Where a payload says the media lives, in selection precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaLocation<'a> {
    Direct(&'a str),
    Picker(&'a [PickerItem]),
    Formats(&'a [FormatEntry]),
}

impl<'a> MediaLocation<'a> {
    /// Choose one URL from this location, preferring MP4 renditions
    pub fn select(&self) -> Option<&'a str> {
        match *self {
            MediaLocation::Direct(url) => Some(url),
            MediaLocation::Picker(items) => items
                .iter()
                .filter_map(|item| item.url.as_deref())
                .find(|url| is_mp4_url(url))
                .or_else(|| items.first().and_then(|item| item.url.as_deref())),
            MediaLocation::Formats(entries) => entries
                .iter()
                .find(|entry| entry.is_mp4())
                .or_else(|| entries.first())
                .and_then(|entry| entry.url.as_deref()),
        }
    }
}

impl MirrorPayload {
    /// Classify a raw JSON value. Fields of unexpected type are treated as absent.
    pub fn from_value(value: &Value) -> Self {
        let picker = value
            .get("picker")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| PickerItem {
                        url: non_empty_str(item.get("url")),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let formats = value
            .get("formats")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(FormatEntry::from_value).collect())
            .unwrap_or_default();

        Self {
            status: non_empty_str(value.get("status")),
            text: non_empty_str(value.get("text")),
            url: non_empty_str(value.get("url")),
            picker,
            formats,
            filename: non_empty_str(value.get("filename")),
            author: non_empty_str(value.get("author")),
            cover: non_empty_str(value.get("cover")),
        }
    }

    /// Check if the mirror reported an explicit error status
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    /// Media locations present in this payload, highest precedence first
    pub fn media_locations(&self) -> Vec<MediaLocation<'_>> {
        let mut locations = Vec::with_capacity(3);

        if let Some(url) = self.url.as_deref().filter(|u| is_http_url(u)) {
            locations.push(MediaLocation::Direct(url));
        }
        if !self.picker.is_empty() {
            locations.push(MediaLocation::Picker(&self.picker));
        }
        if !self.formats.is_empty() {
            locations.push(MediaLocation::Formats(&self.formats));
        }

        locations
    }
}

/// Pick the best playable URL from a mirror payload
pub fn pick_best_url(payload: &MirrorPayload) -> Option<String> {
    payload
        .media_locations()
        .into_iter()
        .find_map(|location| location.select())
        .map(str::to_string)
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
