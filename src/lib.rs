//! Tweet media extractor library.
//!
//! Turns a public post URL into a normalized record of author identity,
//! text, and deduplicated full-resolution media URLs, without authenticated
//! API access. The pipeline degrades through tiers — a static meta-tag fast
//! path, a headless-browser render of the same page, then direct
//! article-DOM heuristics — and classifies failures precisely instead of
//! returning empty successes.

pub mod article;
pub mod canonical;
pub mod config;
pub mod constants;
pub mod error_page;
pub mod extractor;
pub mod fetch;
pub mod media;
pub mod meta;
pub mod render;
pub mod types;

pub use extractor::Extractor;
pub use types::{ExtractionResult, FailureReason, MediaItem, MediaKind};
