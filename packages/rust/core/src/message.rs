//! Conversation-facing surface: turn an incoming message into report
//! chunks.
//!
//! The chat transport itself lives outside this crate; whatever delivers
//! the message calls [`handle_message`] and sends each returned chunk as a
//! separate outgoing message, in order.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use linkscout_shared::{ResearchConfig, truncate_chars};

use crate::pipeline::{self, ResearchProgress};

/// Matches http(s) URLs in free text.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("url regex"));

/// Reply sent when the message contains no URL at all.
const NO_URL_REPLY: &str = "Send a project link to analyze.";

/// Handle one incoming message: research up to
/// `cfg.max_urls_per_message` URLs and chunk each report.
///
/// An unexpected pipeline fault becomes a generic analysis-error chunk
/// for that URL; other URLs in the message are still processed.
pub async fn handle_message(
    cfg: &ResearchConfig,
    text: &str,
    progress: &dyn ResearchProgress,
) -> Vec<String> {
    let urls: Vec<&str> = URL_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .take(cfg.max_urls_per_message)
        .collect();

    if urls.is_empty() {
        return vec![NO_URL_REPLY.to_string()];
    }

    let mut chunks = Vec::new();
    for url in urls {
        info!(url, "researching url from message");
        match pipeline::research(cfg, url, progress).await {
            Ok(report) => chunks.extend(chunk_text(&report, cfg.chunk_chars)),
            Err(e) => {
                warn!(url, error = %e, "research failed");
                chunks.push(format!("Analysis error: {}", truncate_chars(&e.to_string(), 100)));
            }
        }
    }

    chunks
}

/// Split text into chunks of at most `max_chars` characters.
///
/// Chunks concatenate back to the original text with no loss or
/// duplication; splitting is on char boundaries only.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
