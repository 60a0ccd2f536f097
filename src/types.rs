//! Core data model for the extraction pipeline.
//!
//! All entities are created fresh per extraction call and are immutable
//! after construction; there is no extraction state shared between calls.

use serde::{Deserialize, Serialize};

/// Display name used when the author could not be resolved.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Handle used when the author could not be resolved.
pub const UNKNOWN_HANDLE: &str = "@unknown";

/// Timestamp used when none was found.
pub const UNKNOWN_TIMESTAMP: &str = "Unknown";

/// Kind of a discovered media asset. GIFs are surfaced as videos since the
/// source serves them as MP4s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
}

/// One discovered media asset with a directly fetchable URL.
///
/// The URL is the full-resolution source, never a thumbnail. Two items are
/// duplicates iff their URLs are equal after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub url: String,
}

impl MediaItem {
    pub fn photo(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Photo,
            url: url.into(),
        }
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Video,
            url: url.into(),
        }
    }
}

/// Why an extraction produced no usable content.
///
/// The `Display` impl renders the guidance text a chat-bot caller is
/// expected to surface to the end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// Content exists but sits behind a sign-in sensitivity wall.
    SensitiveContent(String),
    /// The source confirmed an error: deleted, private, suspended, or
    /// age-gated at the source.
    SourceError(String),
    /// No content could be located after exhausting all tiers.
    NotFound(String),
    /// Transport-level failure or timeout; a caller retry may succeed.
    NetworkError(String),
}

impl FailureReason {
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::SensitiveContent(d) | Self::SourceError(d) | Self::NotFound(d) | Self::NetworkError(d) => d,
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SensitiveContent(d) => write!(
                f,
                "This post requires signing in to view sensitive content, which cannot be bypassed: {d}"
            ),
            Self::SourceError(d) => write!(
                f,
                "The source returned an error. The post may be deleted, private, or age-restricted: {d}"
            ),
            Self::NotFound(d) => {
                write!(f, "No post content was found. Check the link and try again: {d}")
            }
            Self::NetworkError(d) => write!(f, "Network error while fetching the post: {d}"),
        }
    }
}

/// Normalized record produced by one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub author_name: String,
    pub author_handle: String,
    pub text: String,
    /// Discovery order, deduplicated by normalized URL.
    pub media: Vec<MediaItem>,
    /// Opaque, best-effort.
    pub timestamp: String,
    /// When present, all other fields are ignored by the consumer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self {
            author_name: UNKNOWN_NAME.to_string(),
            author_handle: UNKNOWN_HANDLE.to_string(),
            text: String::new(),
            media: Vec::new(),
            timestamp: UNKNOWN_TIMESTAMP.to_string(),
            failure: None,
        }
    }
}

impl ExtractionResult {
    /// A result that carries only a failure.
    #[must_use]
    pub fn failed(reason: FailureReason) -> Self {
        Self {
            failure: Some(reason),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    #[must_use]
    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_keeps_defaults() {
        let result = ExtractionResult::failed(FailureReason::NotFound("gone".to_string()));
        assert!(result.is_failure());
        assert!(!result.has_media());
        assert_eq!(result.author_name, UNKNOWN_NAME);
        assert_eq!(result.author_handle, UNKNOWN_HANDLE);
        assert_eq!(result.timestamp, UNKNOWN_TIMESTAMP);
    }

    #[test]
    fn test_failure_detail() {
        let reason = FailureReason::NetworkError("timed out".to_string());
        assert_eq!(reason.detail(), "timed out");
    }

    #[test]
    fn test_failure_display_mentions_guidance() {
        let source = FailureReason::SourceError("error page".to_string());
        assert!(source.to_string().contains("deleted, private, or age-restricted"));

        let sensitive = FailureReason::SensitiveContent("wall".to_string());
        assert!(sensitive.to_string().contains("cannot be bypassed"));
    }

    #[test]
    fn test_serializes_without_failure_field_on_success() {
        let result = ExtractionResult {
            media: vec![MediaItem::photo("https://example.com/a.jpg")],
            ..ExtractionResult::default()
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("failure"));
        assert!(json.contains("photo"));
    }
}
