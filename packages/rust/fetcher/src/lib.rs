//! Page fetcher: retrieves a project page and extracts social links.
//!
//! This crate provides:
//! - [`PageFetcher`] — HTTP fetch with a bounded timeout and browser-like UA
//! - [`extract`] — anchor classification and free-text handle/repo mining
//!
//! `fetch` never fails: any network or parse problem is folded into an
//! [`ExtractionResult`] whose title carries a short error description.

pub mod extract;

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use linkscout_shared::{
    ExtractionResult, LinkscoutError, Platform, PlatformLink, ResearchConfig, Result,
    truncate_chars,
};

/// Browser-like User-Agent for page fetches; some landing pages refuse
/// requests that identify as a bot.
const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; linkscout/0.1; +https://github.com/linkscout/linkscout)";

/// Maximum characters of an error description kept in the title field.
const MAX_ERROR_CHARS: usize = 100;

/// Fetches project pages and extracts a title plus classified social links.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Create a new fetcher with the configured timeout.
    pub fn new(cfg: &ResearchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| LinkscoutError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Create a fetcher with an explicit timeout (used by tests).
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let mut cfg = ResearchConfig::default();
        cfg.timeout = timeout;
        Self::new(&cfg)
    }

    /// Fetch a page and extract title, platform links, and handles.
    ///
    /// Never fails: on any error the returned title holds a truncated
    /// description and the link/handle sets are empty.
    pub async fn fetch(&self, url: &str) -> ExtractionResult {
        match self.try_fetch(url).await {
            Ok(result) => result,
            Err(e) => {
                warn!(url, error = %e, "page fetch failed");
                ExtractionResult {
                    title: truncate_chars(&format!("fetch failed: {e}"), MAX_ERROR_CHARS),
                    links: Vec::new(),
                    handles: Vec::new(),
                }
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<ExtractionResult> {
        let parsed = Url::parse(url)
            .map_err(|e| LinkscoutError::malformed(format!("invalid URL '{url}': {e}")))?;

        debug!(%parsed, "fetching page");

        let response = self
            .client
            .get(parsed.as_str())
            .send()
            .await
            .map_err(|e| LinkscoutError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkscoutError::Upstream {
                service: "page".into(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LinkscoutError::Network(format!("{url}: body read failed: {e}")))?;

        Ok(extract_page(&parsed, &body))
    }
}

/// Parse a fetched body into an [`ExtractionResult`]. Synchronous so the
/// non-`Send` HTML document never crosses an await point.
fn extract_page(url: &Url, body: &str) -> ExtractionResult {
    let doc = Html::parse_document(body);

    let title = extract_title(&doc).unwrap_or_else(|| url.to_string());
    let mut links = extract::extract_platform_links(&doc, url);
    let text: String = doc.root_element().text().collect::<Vec<_>>().join(" ");

    // Synthesize links from mined tokens, reusing the same dedup-by-URL set.
    let handles = extract::mine_handles(&text);
    for handle in &handles {
        push_unique(
            &mut links,
            Platform::Twitter,
            format!("https://twitter.com/{handle}"),
        );
    }
    for repo in extract::mine_repos(&text) {
        push_unique(
            &mut links,
            Platform::Github,
            format!("https://github.com/{repo}"),
        );
    }

    debug!(
        title = %title,
        links = links.len(),
        handles = handles.len(),
        "page extracted"
    );

    ExtractionResult {
        title,
        links,
        handles,
    }
}

/// Document title, falling back to the first heading.
fn extract_title(doc: &Html) -> Option<String> {
    let title_sel = Selector::parse("title").expect("title selector");
    let h1_sel = Selector::parse("h1").expect("h1 selector");

    for sel in [&title_sel, &h1_sel] {
        if let Some(el) = doc.select(sel).next() {
            let text = el.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    None
}

/// Append a link unless an equal URL is already present.
fn push_unique(links: &mut Vec<PlatformLink>, platform: Platform, url: String) {
    if links.iter().all(|l| l.url != url) {
        links.push(PlatformLink { platform, url });
    }
}
