//! Media URL classification and normalization.
//!
//! Photo URLs on the media CDN are rewritten to their original-resolution
//! form; GIF thumbnails are rewritten to the direct video asset. The final
//! pass deduplicates by post-normalization URL in first-seen order.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::constants::{PHOTO_HOST, VIDEO_HOST};
use crate::types::{MediaItem, MediaKind};

/// Size parameter value that requests the original-resolution photo asset.
const MAX_RES: &str = "4096x4096";

/// Matches a GIF asset or its thumbnail and captures the asset id.
static GIF_ASSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tweet_video(?:_thumb)?/([A-Za-z0-9_-]+)(?:\.\w+)?").unwrap());

/// Rewrite a sized photo URL to its maximum-resolution form.
///
/// Existing size parameters are stripped and the max-resolution parameter is
/// appended, so the delivered asset is the original rather than a thumbnail.
/// Idempotent. URLs that are not the media CDN's sized-photo form pass
/// through unchanged.
#[must_use]
pub fn full_resolution_photo_url(src: &str) -> String {
    if !is_sized_photo(src) {
        return src.to_string();
    }
    let Ok(mut parsed) = Url::parse(src) else {
        return src.to_string();
    };
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k.as_ref() != "name")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    parsed.set_query(None);
    {
        let mut pairs = parsed.query_pairs_mut();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("name", MAX_RES);
    }
    parsed.to_string()
}

fn is_sized_photo(src: &str) -> bool {
    src.contains(&format!("{PHOTO_HOST}/media")) || src.contains("name=")
}

/// Rewrite a GIF asset URL (or its `_thumb` form) to the canonical direct
/// MP4 URL for the captured id. Returns `None` for non-GIF sources.
#[must_use]
pub fn gif_video_url(src: &str) -> Option<String> {
    GIF_ASSET
        .captures(src)
        .map(|caps| format!("https://{VIDEO_HOST}/tweet_video/{}.mp4", &caps[1]))
}

/// Normalize every item and drop later duplicates, keeping first-seen order.
#[must_use]
pub fn normalize_media(items: Vec<MediaItem>) -> Vec<MediaItem> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let url = match item.kind {
            MediaKind::Photo => full_resolution_photo_url(&item.url),
            MediaKind::Video => item.url,
        };
        if seen.insert(url.clone()) {
            out.push(MediaItem {
                kind: item.kind,
                url,
            });
        }
    }
    out
}
