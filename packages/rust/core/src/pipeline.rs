//! Research pipeline: fetch, enrich, score.
//!
//! `research` is a strictly sequential aggregation: the page summary comes
//! first, then one enrichment per detected platform (first link wins),
//! then the scoring section over everything produced so far. Enricher
//! failures are already folded into their section text, so a dead API
//! never aborts the run.

use reqwest::Client;
use tracing::{info, instrument};

use linkscout_enrich::{codehost, community, market, social};
use linkscout_fetcher::PageFetcher;
use linkscout_shared::{LinkscoutError, Platform, ResearchConfig, Result};

use crate::scorer;

/// User-Agent for enrichment API calls.
const API_USER_AGENT: &str = concat!("linkscout/", env!("CARGO_PKG_VERSION"));

/// Progress callback for research runs.
pub trait ResearchProgress: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
}

/// No-op progress reporter.
pub struct SilentProgress;

impl ResearchProgress for SilentProgress {
    fn phase(&self, _name: &str) {}
}

/// Research a project URL into a full report.
///
/// Deterministic sequence: page summary, social profile, market data,
/// code-host, chat community, assessment. Only one link per detected
/// platform is enriched, in the order the fetcher inserted them.
#[instrument(skip_all, fields(url = %url))]
pub async fn research(
    cfg: &ResearchConfig,
    url: &str,
    progress: &dyn ResearchProgress,
) -> Result<String> {
    let client = Client::builder()
        .user_agent(API_USER_AGENT)
        .timeout(cfg.timeout)
        .build()
        .map_err(|e| LinkscoutError::Network(format!("failed to build HTTP client: {e}")))?;

    let fetcher = PageFetcher::new(cfg)?;

    progress.phase("Fetching page");
    let extraction = fetcher.fetch(url).await;

    let mut sections: Vec<String> = vec![extraction.summary(cfg.max_links)];

    // Social profile, then market data with the same handle as a
    // speculative token symbol.
    let handle = extraction
        .first_link(Platform::Twitter)
        .map(|l| social::normalize_handle(&l.url))
        .or_else(|| extraction.handles.first().cloned())
        .filter(|h| !h.is_empty());

    if let Some(handle) = handle {
        progress.phase("Looking up social profile");
        sections.push(social::lookup(&client, cfg, &handle).await);

        progress.phase("Looking up market data");
        sections.push(market::lookup(&client, cfg, &handle).await);
    }

    if let Some(link) = extraction.first_link(Platform::Github) {
        progress.phase("Looking up repository");
        sections.push(codehost::lookup(&client, cfg, &link.url).await);
    }

    if let Some(link) = extraction.first_link(Platform::Discord) {
        progress.phase("Looking up community");
        sections.push(community::lookup(&client, cfg, &link.url).await);
    }

    let body = sections
        .iter()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n\n");

    progress.phase("Scoring");
    let outcome = scorer::score(&body);

    info!(
        sections = sections.len(),
        factors = outcome.factors.len(),
        verdict = %outcome.verdict,
        "research complete"
    );

    Ok(format!("{body}\n\n{}", scorer::render(&outcome)))
}
