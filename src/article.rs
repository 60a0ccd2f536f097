//! Heuristic extraction from a rendered article container.
//!
//! Every tier here is a pure function over the parsed document, so markup
//! drift in the externally-controlled page only requires adding a tier, and
//! each one can be exercised against captured HTML fixtures without a
//! browser. The rendered snapshot comes from [`crate::render`].

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::canonical;
use crate::constants::{PHOTO_HOST, VIDEO_HOST};
use crate::media;
use crate::types::MediaItem;

/// Span texts containing one of these are engagement chrome, not post text.
/// Heuristic, tuned against current markup.
const ENGAGEMENT_WORDS: &[&str] = &[
    "Reply", "Repost", "Retweet", "Like", "Bookmark", "Views", "Share", "Follow",
];

static ARTICLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"article[role="article"]"#).unwrap());
static AUTHOR_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[data-testid="User-Name"]"#).unwrap());
static LANG_DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div[lang]").unwrap());
static SPAN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static VIDEO: LazyLock<Selector> = LazyLock::new(|| Selector::parse("video").unwrap());
static SOURCE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("source").unwrap());
static TIME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("time").unwrap());
static ANY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("*").unwrap());
static DATA_VIDEO: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-video-url]").unwrap());

/// Everything the article container yielded. Media is raw discovery order;
/// normalization and final dedup happen in [`crate::media`].
#[derive(Debug, Clone, Default)]
pub struct ArticleExtraction {
    pub author_name: Option<String>,
    pub author_handle: Option<String>,
    pub text: String,
    pub media: Vec<MediaItem>,
    pub timestamp: Option<String>,
}

/// Extract author, text, media, and timestamp from a rendered page.
///
/// `page_url` feeds the URL-derived author fallback. Returns `None` when no
/// article container is present in the markup.
#[must_use]
pub fn extract_article(
    html: &str,
    page_url: &str,
    min_text_len: usize,
    photo_cap: usize,
) -> Option<ArticleExtraction> {
    let document = Html::parse_document(html);
    let article = document.select(&ARTICLE).next()?;

    let (author_name, author_handle) = resolve_author(article, page_url);
    let text = resolve_text(article, min_text_len);
    let media = discover_media(article, photo_cap);
    let timestamp = article
        .select(&TIME)
        .next()
        .map(collect_text)
        .filter(|t| !t.is_empty());

    Some(ArticleExtraction {
        author_name,
        author_handle,
        text,
        media,
        timestamp,
    })
}

/// Three-tier author resolution: structured author block, profile-link
/// scan, then the page's own path.
fn resolve_author(article: ElementRef<'_>, page_url: &str) -> (Option<String>, Option<String>) {
    let mut name = None;
    let mut handle = None;

    if let Some(block) = article.select(&AUTHOR_BLOCK).next() {
        let fragments: Vec<String> = block
            .select(&SPAN)
            .map(collect_text)
            .filter(|t| !t.is_empty())
            .collect();
        name = fragments.iter().find(|t| !t.starts_with('@')).cloned();
        handle = fragments.iter().find(|t| t.starts_with('@')).cloned();
    }

    if name.is_none() || handle.is_none() {
        let (link_name, link_handle) = scan_profile_links(article);
        if name.is_none() {
            name = link_name;
        }
        if handle.is_none() {
            handle = link_handle;
        }
    }

    if handle.is_none() {
        handle = canonical::handle_from_path(page_url).map(|segment| format!("@{segment}"));
    }

    (name, handle)
}

/// Among anchors targeting a single-segment path (profile links), the first
/// link's text is the display name and a later `@`-prefixed link text is
/// the handle.
fn scan_profile_links(article: ElementRef<'_>) -> (Option<String>, Option<String>) {
    let mut name = None;
    let mut handle = None;

    for anchor in article.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !is_profile_href(href) {
            continue;
        }
        if anchor.select(&IMG).next().is_some() {
            continue;
        }
        let text = collect_text(anchor);
        if text.is_empty() {
            continue;
        }
        if name.is_none() {
            name = Some(text);
        } else if handle.is_none() && text.starts_with('@') {
            handle = Some(text);
            break;
        }
    }

    (name, handle)
}

fn is_profile_href(href: &str) -> bool {
    if !href.starts_with('/') {
        return false;
    }
    if href.contains("/status/") || href.contains("/hashtag/") || href.contains("/photo/") {
        return false;
    }
    let path = href.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_start_matches('/').trim_end_matches('/');
    !trimmed.is_empty() && !trimmed.contains('/')
}

/// The language-tagged container holds the post text. Sub-spans are joined
/// in document order; a too-short result triggers a secondary scan that
/// skips metadata-looking spans.
fn resolve_text(article: ElementRef<'_>, min_text_len: usize) -> String {
    let mut text = String::new();

    if let Some(container) = article.select(&LANG_DIV).next() {
        let spans: Vec<String> = container
            .select(&SPAN)
            .map(|span| span.text().collect::<String>())
            .collect();
        text = if spans.is_empty() {
            container.text().collect::<String>()
        } else {
            spans.concat()
        };
        text = text.trim().to_string();
    }

    if text.len() >= min_text_len {
        return text;
    }

    for span in article.select(&SPAN) {
        let candidate = collect_text(span);
        if candidate.len() < min_text_len || looks_like_metadata(&candidate) {
            continue;
        }
        return candidate;
    }

    text
}

fn looks_like_metadata(text: &str) -> bool {
    text.starts_with('@')
        || text.contains('\u{b7}')
        || text.contains("http")
        || ENGAGEMENT_WORDS.iter().any(|word| text.contains(word))
}

/// Layered media discovery over the article subtree.
///
/// Priority: GIF-thumbnail rewrite beats photo classification for the same
/// `<img>`; `<video>` trees, then loose video-host references, then the
/// explicit data attribute. Photos stop at `photo_cap`; videos are not
/// capped here. Duplicates are left for the final normalization pass.
fn discover_media(article: ElementRef<'_>, photo_cap: usize) -> Vec<MediaItem> {
    let mut items: Vec<MediaItem> = Vec::new();
    let mut photos = 0usize;

    for img in article.select(&IMG) {
        let src = img
            .value()
            .attr("src")
            .or_else(|| img.value().attr("data-src"))
            .unwrap_or("");
        if src.is_empty() {
            continue;
        }
        if src.contains("tweet_video") {
            if let Some(video_url) = media::gif_video_url(src) {
                items.push(MediaItem::video(video_url));
            }
            continue;
        }
        if !is_article_photo(src) {
            continue;
        }
        if photos < photo_cap {
            items.push(MediaItem::photo(src));
            photos += 1;
        }
    }

    for video in article.select(&VIDEO) {
        if let Some(src) = video.value().attr("src") {
            if !src.is_empty() {
                items.push(MediaItem::video(src));
            }
        }
        for source in video.select(&SOURCE) {
            if let Some(src) = source.value().attr("src") {
                if !src.is_empty() {
                    items.push(MediaItem::video(src));
                }
            }
        }
    }

    for element in article.select(&ANY) {
        for attr in ["src", "data-src"] {
            if let Some(value) = element.value().attr(attr) {
                if value.contains(VIDEO_HOST) && !items.iter().any(|m| m.url == value) {
                    items.push(MediaItem::video(value));
                }
            }
        }
    }

    for element in article.select(&DATA_VIDEO) {
        if let Some(value) = element.value().attr("data-video-url") {
            if value.contains(VIDEO_HOST) && !items.iter().any(|m| m.url == value) {
                items.push(MediaItem::video(value));
            }
        }
    }

    items
}

/// A photo-host image that is actual post media: not an avatar, not an
/// emoji, not a profile-size variant, not an inline-video thumbnail.
fn is_article_photo(src: &str) -> bool {
    if !src.contains(PHOTO_HOST) {
        return false;
    }
    !(src.contains("profile_images")
        || src.contains("/emoji/")
        || src.contains("_normal.")
        || src.contains("video_thumb"))
}

fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
