//! Fast-path fetch of the canonical URL.
//!
//! A single GET with redirects disabled: the proxy serves its meta tags on
//! the first response, and following redirects would land on the
//! script-gated source page.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, redirect, Client, StatusCode};

use crate::constants::BROWSER_USER_AGENT;

/// Build the shared HTTP client used by the fast path.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(redirect::Policy::none())
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch the canonical URL, returning the status and raw body text.
///
/// Classification of non-200 statuses is the caller's job; a transport
/// error here is already a hard failure.
pub async fn fetch_page(client: &Client, url: &str) -> Result<(StatusCode, String)> {
    let response = client
        .get(url)
        .header(header::ACCEPT, "text/html,application/xhtml+xml")
        .send()
        .await
        .context("Failed to send request")?;

    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    Ok((status, body))
}
