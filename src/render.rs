//! Headless-browser render of the canonical URL.
//!
//! Used only when the static fast path yields no media. Each call launches
//! an isolated browser, navigates to DOM readiness (the page keeps loading
//! lazily long after, so waiting for network idle would stall), snapshots
//! the DOM, and waits a bounded time for the article container before
//! snapshotting again. The session is released on every exit path: an
//! explicit close after the page-driving future resolves, with a `Drop`
//! backstop that kills the browser process in the background.

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::BROWSER_USER_AGENT;

/// Selector for the post's article container in the rendered DOM.
const ARTICLE_SELECTOR: &str = r#"article[role="article"]"#;

/// How often the article wait re-polls the DOM.
const ARTICLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Snapshot of the rendered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// DOM serialized once navigation reached DOM readiness.
    pub html: String,
    /// DOM serialized after the article container appeared; `None` when it
    /// never did within the bounded wait.
    pub article_html: Option<String>,
}

/// One isolated browser session.
struct RenderSession {
    browser: Option<Browser>,
    handler: JoinHandle<()>,
    runtime: tokio::runtime::Handle,
}

impl RenderSession {
    async fn launch(config: &Config) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .request_timeout(config.render_nav_timeout)
            .no_sandbox()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio")
            .arg("--hide-scrollbars")
            .arg(format!("--user-agent={BROWSER_USER_AGENT}"));

        if let Some(ref chrome_path) = config.chrome_path {
            builder = builder.chrome_executable(chrome_path);
        }

        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch browser")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e}");
                }
            }
        });

        Ok(Self {
            browser: Some(browser),
            handler,
            runtime: tokio::runtime::Handle::current(),
        })
    }

    fn browser(&self) -> Result<&Browser> {
        self.browser.as_ref().context("Browser already closed")
    }

    async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {e}");
            }
            let _ = browser.wait().await;
        }
        self.handler.abort();
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.handler.abort();
        if let Some(mut browser) = self.browser.take() {
            self.runtime.spawn(async move {
                let _ = browser.kill().await;
            });
        }
    }
}

/// Render the canonical URL and snapshot the DOM.
///
/// # Errors
///
/// Returns an error on launch, navigation, or DOM-serialization failure —
/// all transport-level conditions. Absence of the article container is not
/// an error; it is reported through `article_html = None`.
pub async fn render_post(config: &Config, url: &str) -> Result<RenderedPage> {
    let session = RenderSession::launch(config).await?;
    let outcome = drive_page(&session, config, url).await;
    session.close().await;
    outcome
}

async fn drive_page(session: &RenderSession, config: &Config, url: &str) -> Result<RenderedPage> {
    let browser = session.browser()?;

    let page = tokio::time::timeout(config.render_nav_timeout, browser.new_page(url))
        .await
        .context("Navigation timed out")?
        .context("Failed to open page")?;

    match tokio::time::timeout(config.render_nav_timeout, page.wait_for_navigation()).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => return Err(anyhow::Error::new(e).context("Navigation failed")),
        Err(_) => anyhow::bail!("Navigation timed out"),
    }

    let html = page
        .content()
        .await
        .context("Failed to serialize rendered DOM")?;

    let article_html = wait_for_article(&page, config.article_wait_timeout).await?;
    if article_html.is_some() {
        debug!(url = %url, "Article container appeared");
    } else {
        debug!(url = %url, "Article container never appeared");
    }

    if let Err(e) = page.close().await {
        debug!("Failed to close page: {e}");
    }

    Ok(RenderedPage { html, article_html })
}

/// Poll for the article container within the bounded wait, returning the
/// DOM snapshot once it appears.
async fn wait_for_article(page: &Page, timeout: Duration) -> Result<Option<String>> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if page.find_element(ARTICLE_SELECTOR).await.is_ok() {
            let html = page
                .content()
                .await
                .context("Failed to serialize article DOM")?;
            return Ok(Some(html));
        }
        if tokio::time::Instant::now() >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(ARTICLE_POLL_INTERVAL).await;
    }
}
