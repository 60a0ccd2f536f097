//! Integration tests for the extraction pipeline over a mock proxy.
//!
//! These exercise the network-facing tiers end to end: fast-path fetch,
//! error classification, meta parsing, and failure taxonomy. Rendering is
//! disabled (`Config::for_testing`) so no browser is ever launched; the
//! article-DOM tiers are covered by fixture tests inside the library.

use tweet_media_extractor::config::Config;
use tweet_media_extractor::{Extractor, FailureReason, MediaKind};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_extractor() -> Extractor {
    Extractor::new(Config::for_testing()).expect("failed to build extractor")
}

const POST_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta property="og:title" content="Jane Doe (@janedoe)">
    <meta property="og:description" content="a post with one picture">
    <meta property="og:image" content="https://cdn.example/img1.jpg">
  </head>
  <body></body>
</html>"#;

const TEXT_ONLY_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta property="og:title" content="Jane Doe (@janedoe)">
    <meta property="og:description" content="no media here">
  </head>
  <body></body>
</html>"#;

const ERROR_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <body>
    <div>Something went wrong. Try reloading.</div>
  </body>
</html>"#;

#[tokio::test]
async fn test_fast_path_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/janedoe/status/42"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(POST_PAGE, "text/html"))
        .mount(&mock_server)
        .await;

    let extractor = test_extractor();
    let result = extractor
        .extract_canonical(&format!("{}/janedoe/status/42", mock_server.uri()))
        .await;

    assert!(result.failure.is_none(), "failure: {:?}", result.failure);
    assert_eq!(result.author_name, "Jane Doe");
    assert_eq!(result.author_handle, "@janedoe");
    assert_eq!(result.text, "a post with one picture");
    assert_eq!(result.media.len(), 1);
    assert_eq!(result.media[0].kind, MediaKind::Photo);
    assert_eq!(result.media[0].url, "https://cdn.example/img1.jpg");
}

#[tokio::test]
async fn test_error_page_classified_as_source_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone/status/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ERROR_PAGE, "text/html"))
        .mount(&mock_server)
        .await;

    let extractor = test_extractor();
    let result = extractor
        .extract_canonical(&format!("{}/gone/status/1", mock_server.uri()))
        .await;

    assert!(matches!(result.failure, Some(FailureReason::SourceError(_))));
    assert!(result.media.is_empty());
}

#[tokio::test]
async fn test_non_200_is_network_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/status/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let extractor = test_extractor();
    let result = extractor
        .extract_canonical(&format!("{}/user/status/1", mock_server.uri()))
        .await;

    assert!(matches!(result.failure, Some(FailureReason::NetworkError(_))));
}

#[tokio::test]
async fn test_redirects_are_not_followed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/status/1"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "https://elsewhere.example/"),
        )
        .mount(&mock_server)
        .await;

    let extractor = test_extractor();
    let result = extractor
        .extract_canonical(&format!("{}/user/status/1", mock_server.uri()))
        .await;

    // A redirect means the canonical host did not serve the page itself.
    assert!(matches!(result.failure, Some(FailureReason::NetworkError(_))));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let extractor = test_extractor();
    let result = extractor
        .extract_canonical("http://127.0.0.1:1/user/status/1")
        .await;

    assert!(matches!(result.failure, Some(FailureReason::NetworkError(_))));
}

#[tokio::test]
async fn test_no_media_with_render_disabled_is_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/janedoe/status/42"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(TEXT_ONLY_PAGE, "text/html"))
        .mount(&mock_server)
        .await;

    let extractor = test_extractor();
    let result = extractor
        .extract_canonical(&format!("{}/janedoe/status/42", mock_server.uri()))
        .await;

    assert!(matches!(result.failure, Some(FailureReason::NotFound(_))));
}

#[tokio::test]
async fn test_handle_falls_back_to_url_segment() {
    let page = r#"<html><head>
        <meta property="og:image" content="https://cdn.example/img1.jpg">
    </head><body></body></html>"#;

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alice/status/42"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html"))
        .mount(&mock_server)
        .await;

    let extractor = test_extractor();
    let result = extractor
        .extract_canonical(&format!("{}/alice/status/42", mock_server.uri()))
        .await;

    assert!(result.failure.is_none());
    assert_eq!(result.author_handle, "@alice");
    assert_eq!(result.author_name, "alice");
}

#[tokio::test]
async fn test_full_extract_canonicalizes_first() {
    // An unrecognizable token never reaches the network.
    let extractor = test_extractor();
    let result = extractor.extract("hello no url here").await;
    assert!(matches!(result.failure, Some(FailureReason::NotFound(_))));
}

#[tokio::test]
async fn test_meta_images_deduplicated_across_variants() {
    let page = r#"<html><head>
        <meta property="og:title" content="Jane Doe (@janedoe)">
        <meta property="og:image" content="https://cdn.example/a.jpg">
        <meta name="twitter:image" content="https://cdn.example/a.jpg">
        <meta property="og:image" content="https://cdn.example/b.jpg">
    </head><body></body></html>"#;

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/janedoe/status/42"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html"))
        .mount(&mock_server)
        .await;

    let extractor = test_extractor();
    let result = extractor
        .extract_canonical(&format!("{}/janedoe/status/42", mock_server.uri()))
        .await;

    assert!(result.failure.is_none());
    let urls: Vec<&str> = result.media.iter().map(|m| m.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://cdn.example/a.jpg", "https://cdn.example/b.jpg"]
    );
}
