//! Shared constants used across the extraction pipeline.

/// User agent sent on fetches and handed to the headless browser.
///
/// A realistic desktop browser string; the mobile layout hides several of
/// the DOM hooks the article extractor relies on.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Hostname of the unauthenticated rendering proxy every recognized post
/// URL is rewritten to.
pub const PROXY_HOST: &str = "fixupx.com";

/// Host serving photo assets.
pub const PHOTO_HOST: &str = "pbs.twimg.com";

/// Host serving video and GIF-as-video assets.
pub const VIDEO_HOST: &str = "video.twimg.com";
