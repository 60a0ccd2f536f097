//! Detection of source error pages and sensitivity walls.

/// Phrase the source renders on deleted, private, suspended, and age-gated
/// posts. It also appears in the chrome of some valid pages, so detection
/// additionally requires the absence of any meta image marker.
const ERROR_PHRASE: &str = "Something went wrong";

/// Marker that distinguishes a real post page from a bare error page.
const META_IMAGE_MARKER: &str = "og:image";

/// Phrases shown on the sign-in-to-view sensitivity interstitial.
const SENSITIVE_MARKERS: &[&str] = &[
    "potentially sensitive content",
    "sensitive media",
    "this media may contain sensitive",
    "age-restricted adult content",
];

/// Whether a fast-path body is the source's error page.
///
/// Both conditions are required: the error phrase alone is not conclusive.
#[must_use]
pub fn is_source_error_page(html: &str) -> bool {
    html.contains(ERROR_PHRASE) && !html.contains(META_IMAGE_MARKER)
}

/// Whether a rendered page body carries the error phrase. Rendered markup
/// varies in casing, so this check is case-insensitive.
#[must_use]
pub fn rendered_page_has_error(html: &str) -> bool {
    html.to_ascii_lowercase().contains("something went wrong")
}

/// Whether a rendered page shows the sensitivity wall instead of content.
/// Only meaningful after a render attempt; the static page does not carry
/// these markers reliably.
#[must_use]
pub fn rendered_page_has_sensitivity_wall(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    SENSITIVE_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_page_requires_both_conditions() {
        assert!(is_source_error_page(
            "<html><body>Something went wrong. Try reloading.</body></html>"
        ));
        // Error phrase in page chrome of a valid post is not an error page.
        assert!(!is_source_error_page(
            r#"<meta property="og:image" content="x"><div>Something went wrong</div>"#
        ));
        assert!(!is_source_error_page("<html><body>a normal page</body></html>"));
    }

    #[test]
    fn test_rendered_error_is_case_insensitive() {
        assert!(rendered_page_has_error("<div>something went wrong</div>"));
        assert!(rendered_page_has_error("<div>SOMETHING WENT WRONG</div>"));
        assert!(!rendered_page_has_error("<div>all good</div>"));
    }

    #[test]
    fn test_sensitivity_wall_markers() {
        assert!(rendered_page_has_sensitivity_wall(
            "<div>The following media includes potentially sensitive content</div>"
        ));
        assert!(rendered_page_has_sensitivity_wall(
            "<div>This Tweet contains Sensitive Media</div>"
        ));
        assert!(!rendered_page_has_sensitivity_wall(
            "<div>a perfectly ordinary post</div>"
        ));
    }
}
