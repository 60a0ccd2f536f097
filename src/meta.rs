//! Meta-tag extraction from page markup.
//!
//! The fast path parses `<meta>` tags out of the raw HTML without executing
//! any scripts. Working on the parsed document makes the extraction
//! tolerant of attribute ordering (`property=...content=...` versus
//! `content=...property=...`) and quoting differences for free.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::canonical;

/// All image candidates, both the Open Graph and the card spelling. A
/// single comma list keeps document order across the variants.
static IMAGE_META: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"meta[property="og:image"], meta[name="og:image"], meta[property="twitter:image"], meta[name="twitter:image"]"#,
    )
    .unwrap()
});

static TITLE_META: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:title"], meta[name="og:title"]"#).unwrap()
});

static DESCRIPTION_META: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:description"], meta[name="og:description"]"#).unwrap()
});

/// The parenthesized handle inside an `og:title` of the form
/// `"Display Name (@handle)"`.
static TITLE_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((@[A-Za-z0-9_]+)\)").unwrap());

/// Author and media candidates pulled from `<meta>` tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaExtraction {
    pub author_name: Option<String>,
    pub author_handle: Option<String>,
    pub text: Option<String>,
    /// Document order, deduplicated by raw string.
    pub images: Vec<String>,
}

impl MetaExtraction {
    /// The fast path only counts as terminal when it produced media;
    /// text-only or author-only results send the caller to the next tier.
    #[must_use]
    pub fn is_sufficient(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Extract author, text, and image candidates from `<meta>` tags.
///
/// `page_url` supplies the handle fallback: once a post URL canonicalized,
/// the path segment before `/status/` always names the author, so the
/// returned handle is never empty for a valid post page.
#[must_use]
pub fn extract_meta(html: &str, page_url: &str) -> MetaExtraction {
    let document = Html::parse_document(html);

    let mut images: Vec<String> = Vec::new();
    for element in document.select(&IMAGE_META) {
        if let Some(content) = element.value().attr("content") {
            let content = content.trim();
            if !content.is_empty() && !images.iter().any(|u| u == content) {
                images.push(content.to_string());
            }
        }
    }

    let mut author_name = None;
    let mut author_handle = None;
    if let Some(title) = first_content(&document, &TITLE_META) {
        if let Some(caps) = TITLE_HANDLE.captures(&title) {
            author_handle = Some(caps[1].to_string());
            let name = title.replace(&caps[0], "").trim().to_string();
            if !name.is_empty() {
                author_name = Some(name);
            }
        } else {
            author_name = Some(title);
        }
    }

    // The URL names the author even when the title does not.
    if author_handle.is_none() {
        if let Some(segment) = canonical::handle_from_path(page_url) {
            author_handle = Some(format!("@{segment}"));
            if author_name.is_none() {
                author_name = Some(segment);
            }
        }
    }

    let text = first_content(&document, &DESCRIPTION_META);

    MetaExtraction {
        author_name,
        author_handle,
        text,
        images,
    }
}

fn first_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .find_map(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}
