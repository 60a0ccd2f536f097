//! Post-URL recognition and canonicalization.
//!
//! All recognized domain spellings of a post URL are rewritten to the fixed
//! rendering-proxy host, preserving the path and query. Canonicalization is
//! pure and idempotent: the canonical form is itself a recognized spelling
//! that maps to itself.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::PROXY_HOST;

/// Matches a post URL on any recognized domain spelling, capturing the
/// author handle, the status id, and any trailing path/query. The pattern
/// is searched for inside the token, so surrounding brackets, parentheses,
/// and angle quotes fall away on their own.
static POST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(?:www\.)?(?:twitter\.com|x\.com|vxtwitter\.com|fixupx\.com)/(\w+)/status/(\d+)([^\s)\]>]*)",
    )
    .unwrap()
});

/// Pattern to pull the author handle out of a post URL path.
static PATH_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\w+)/status/").unwrap());

/// Pattern to extract the status id from a post URL.
static STATUS_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/status/(\d+)").unwrap());

/// Rewrite the first recognized post URL in `text` to the proxy host.
///
/// Returns `None` when no recognized domain + `/status/` path shape is
/// present anywhere in the input.
#[must_use]
pub fn canonicalize(text: &str) -> Option<String> {
    let caps = POST_URL.captures(text)?;
    let handle = &caps[1];
    let id = &caps[2];
    let rest = caps.get(3).map_or("", |m| m.as_str());
    Some(format!("https://{PROXY_HOST}/{handle}/status/{id}{rest}"))
}

/// The path segment immediately preceding `/status/`, i.e. the author
/// handle the URL names.
#[must_use]
pub fn handle_from_path(url: &str) -> Option<String> {
    PATH_HANDLE
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Extract the numeric status id from a post URL.
#[must_use]
pub fn status_id(url: &str) -> Option<String> {
    STATUS_ID.captures(url).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_spellings_map_to_one_canonical_url() {
        let expected = "https://fixupx.com/user/status/123";
        for input in [
            "https://twitter.com/user/status/123",
            "https://www.twitter.com/user/status/123",
            "https://x.com/user/status/123",
            "https://www.x.com/user/status/123",
            "https://vxtwitter.com/user/status/123",
            "https://fixupx.com/user/status/123",
            "http://x.com/user/status/123",
        ] {
            assert_eq!(canonicalize(input).as_deref(), Some(expected), "{input}");
        }
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = canonicalize("https://twitter.com/user/status/123?s=20").unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_preserves_query_and_trailing_path() {
        assert_eq!(
            canonicalize("https://x.com/user/status/123?s=20&t=abc").as_deref(),
            Some("https://fixupx.com/user/status/123?s=20&t=abc")
        );
        assert_eq!(
            canonicalize("https://x.com/user/status/123/photo/1").as_deref(),
            Some("https://fixupx.com/user/status/123/photo/1")
        );
    }

    #[test]
    fn test_strips_surrounding_brackets() {
        assert_eq!(
            canonicalize("(https://x.com/user/status/123)").as_deref(),
            Some("https://fixupx.com/user/status/123")
        );
        assert_eq!(
            canonicalize("[https://x.com/user/status/123]").as_deref(),
            Some("https://fixupx.com/user/status/123")
        );
        assert_eq!(
            canonicalize("<https://x.com/user/status/123>").as_deref(),
            Some("https://fixupx.com/user/status/123")
        );
    }

    #[test]
    fn test_url_embedded_in_text() {
        assert_eq!(
            canonicalize("check this out https://x.com/user/status/123 wow").as_deref(),
            Some("https://fixupx.com/user/status/123")
        );
    }

    #[test]
    fn test_no_match_without_status_path() {
        assert!(canonicalize("https://x.com/user").is_none());
        assert!(canonicalize("https://example.com/user/status/123").is_none());
        assert!(canonicalize("not a url at all").is_none());
    }

    #[test]
    fn test_handle_from_path() {
        assert_eq!(
            handle_from_path("https://fixupx.com/alice/status/42").as_deref(),
            Some("alice")
        );
        assert!(handle_from_path("https://fixupx.com/alice").is_none());
    }

    #[test]
    fn test_status_id() {
        assert_eq!(
            status_id("https://fixupx.com/alice/status/42?s=20").as_deref(),
            Some("42")
        );
        assert!(status_id("https://fixupx.com/alice").is_none());
    }
}
