//! The extraction pipeline.
//!
//! Tiers, in order: canonicalize, static fast-path fetch, error
//! classification, meta-tag parse, headless render, meta-tag parse over the
//! rendered DOM, article-DOM heuristics, media normalization. Each tier
//! classifies its own failures; nothing escapes [`Extractor::extract`] as
//! an error — every path terminates in a well-formed [`ExtractionResult`].

use anyhow::Result;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::article;
use crate::canonical;
use crate::config::Config;
use crate::error_page;
use crate::fetch;
use crate::media;
use crate::meta::{self, MetaExtraction};
use crate::render;
use crate::types::{
    ExtractionResult, FailureReason, MediaItem, UNKNOWN_HANDLE, UNKNOWN_NAME, UNKNOWN_TIMESTAMP,
};

/// Stateless extraction pipeline over a shared HTTP client.
///
/// Calls are independent; any number may run concurrently. No retry policy
/// is applied here — one fast-path attempt and at most one render attempt
/// are made per call, and callers own anything beyond that.
pub struct Extractor {
    client: Client,
    config: Config,
}

impl Extractor {
    /// Build the pipeline with its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: Config) -> Result<Self> {
        let client = fetch::build_client(config.fetch_timeout)?;
        Ok(Self { client, config })
    }

    /// Extract a post record from a candidate URL token.
    ///
    /// The token may carry surrounding brackets or trailing text; the first
    /// recognized post URL in it is used. An unrecognizable token yields a
    /// `NotFound` failure without any network traffic.
    pub async fn extract(&self, input: &str) -> ExtractionResult {
        let Some(url) = canonical::canonicalize(input) else {
            return ExtractionResult::failed(FailureReason::NotFound(
                "not a recognizable post URL".to_string(),
            ));
        };
        self.extract_canonical(&url).await
    }

    /// Run the pipeline for an already-canonical URL.
    pub async fn extract_canonical(&self, url: &str) -> ExtractionResult {
        debug!(url = %url, "Starting extraction");

        let (status, body) = match fetch::fetch_page(&self.client, url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Fast-path fetch failed");
                return ExtractionResult::failed(FailureReason::NetworkError(format!("{e:#}")));
            }
        };
        if status != StatusCode::OK {
            warn!(url = %url, status = %status, "Proxy returned non-200");
            return ExtractionResult::failed(FailureReason::NetworkError(format!(
                "proxy returned HTTP {status}"
            )));
        }

        if error_page::is_source_error_page(&body) {
            info!(url = %url, "Source error page detected on fast path");
            return ExtractionResult::failed(FailureReason::SourceError(
                "the source served its error page".to_string(),
            ));
        }

        let fast = meta::extract_meta(&body, url);
        if fast.is_sufficient() {
            debug!(url = %url, images = fast.images.len(), "Fast path sufficient");
            return finish_from_meta(fast);
        }

        debug!(url = %url, "No media in static meta tags, falling back to render");
        self.extract_via_render(url).await
    }

    async fn extract_via_render(&self, url: &str) -> ExtractionResult {
        if !self.config.render_enabled {
            return ExtractionResult::failed(FailureReason::NotFound(
                "no media located and rendering is disabled".to_string(),
            ));
        }

        let page = match render::render_post(&self.config, url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "Render failed");
                return ExtractionResult::failed(FailureReason::NetworkError(format!("{e:#}")));
            }
        };

        // Meta tags injected client-side become visible only now.
        let rendered_meta = meta::extract_meta(&page.html, url);
        if rendered_meta.is_sufficient() {
            debug!(url = %url, "Rendered meta tags sufficient");
            return finish_from_meta(rendered_meta);
        }

        if error_page::rendered_page_has_error(&page.html) {
            info!(url = %url, "Source error page detected after render");
            return ExtractionResult::failed(FailureReason::SourceError(
                "the source served its error page".to_string(),
            ));
        }

        let Some(article_html) = page.article_html else {
            if error_page::rendered_page_has_sensitivity_wall(&page.html) {
                info!(url = %url, "Sensitivity wall detected after render");
                return ExtractionResult::failed(FailureReason::SensitiveContent(
                    "the post sits behind a sign-in sensitivity wall".to_string(),
                ));
            }
            return ExtractionResult::failed(FailureReason::NotFound(
                "no article appeared in the rendered page".to_string(),
            ));
        };

        let Some(extraction) = article::extract_article(
            &article_html,
            url,
            self.config.min_text_len,
            self.config.max_album_photos,
        ) else {
            return ExtractionResult::failed(FailureReason::NotFound(
                "the rendered article disappeared before extraction".to_string(),
            ));
        };

        let media = media::normalize_media(extraction.media);
        if media.is_empty() && extraction.text.is_empty() {
            return ExtractionResult::failed(FailureReason::NotFound(
                "the article yielded neither text nor media".to_string(),
            ));
        }

        info!(
            url = %url,
            media = media.len(),
            text_len = extraction.text.len(),
            "Extraction complete via article DOM"
        );

        ExtractionResult {
            author_name: extraction
                .author_name
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            author_handle: extraction
                .author_handle
                .unwrap_or_else(|| UNKNOWN_HANDLE.to_string()),
            text: extraction.text,
            media,
            timestamp: extraction
                .timestamp
                .unwrap_or_else(|| UNKNOWN_TIMESTAMP.to_string()),
            failure: None,
        }
    }
}

/// Turn a sufficient meta extraction into the final record. Meta images are
/// photos; the proxy surfaces videos through the article DOM only.
fn finish_from_meta(extraction: MetaExtraction) -> ExtractionResult {
    let media = media::normalize_media(
        extraction
            .images
            .into_iter()
            .map(MediaItem::photo)
            .collect(),
    );

    ExtractionResult {
        author_name: extraction
            .author_name
            .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        author_handle: extraction
            .author_handle
            .unwrap_or_else(|| UNKNOWN_HANDLE.to_string()),
        text: extraction.text.unwrap_or_default(),
        media,
        timestamp: UNKNOWN_TIMESTAMP.to_string(),
        failure: None,
    }
}
