//! Repository lookup via the GitHub REST API.
//!
//! Requires a bearer token; without one the lookup short-circuits to a
//! fixed "not configured" line. Reports stars/forks/open issues, the top
//! language by byte count, and the three most recent commits.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use linkscout_shared::{LinkscoutError, ResearchConfig, Result, group_thousands, truncate_chars};

use crate::diagnostic;

/// Commit subjects are clipped to this many characters in the report.
const MAX_COMMIT_CHARS: usize = 60;

/// Matches the `owner/repo` part of a GitHub URL or bare fragment.
static OWNER_REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)").expect("owner/repo regex")
});

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RepoInfo {
    stargazers_count: u64,
    forks_count: u64,
    open_issues_count: u64,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    date: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Look up repository metadata for a GitHub URL. Never fails.
pub async fn lookup(client: &Client, cfg: &ResearchConfig, repo_url: &str) -> String {
    let Some((owner, repo)) = parse_owner_repo(repo_url) else {
        return format!("GitHub: invalid repository URL '{repo_url}'");
    };

    let Some(token) = cfg.github_token.as_deref() else {
        return "GitHub: not configured (set GITHUB_TOKEN)".into();
    };

    match try_lookup(client, cfg, token, &owner, &repo).await {
        Ok(text) => text,
        Err(e) => diagnostic("GitHub", &e),
    }
}

/// Extract `(owner, repo)` from a GitHub URL, trimming a `.git` suffix.
pub fn parse_owner_repo(url: &str) -> Option<(String, String)> {
    let caps = OWNER_REPO_RE.captures(url)?;
    let owner = caps[1].to_string();
    let repo = caps[2].trim_end_matches(".git").to_string();
    Some((owner, repo))
}

async fn try_lookup(
    client: &Client,
    cfg: &ResearchConfig,
    token: &str,
    owner: &str,
    repo: &str,
) -> Result<String> {
    let base = format!("{}/repos/{owner}/{repo}", cfg.github_api_base);

    let info: RepoInfo = get_json(client, token, &base).await?;
    let languages: HashMap<String, u64> =
        get_json(client, token, &format!("{base}/languages")).await?;
    let commits: Vec<CommitEntry> =
        get_json(client, token, &format!("{base}/commits?per_page=3")).await?;

    debug!(owner, repo, stars = info.stargazers_count, "repository resolved");

    let mut out = format!(
        "GitHub {owner}/{repo}: {} stars, {} forks, {} open issues",
        group_thousands(info.stargazers_count as i64),
        group_thousands(info.forks_count as i64),
        group_thousands(info.open_issues_count as i64),
    );

    if let Some(top) = top_language(&languages) {
        out.push_str(&format!("\n  Top language: {top}"));
    }

    if !commits.is_empty() {
        out.push_str("\n  Recent commits:");
        for entry in &commits {
            let subject = entry.commit.message.lines().next().unwrap_or("");
            let date = entry
                .commit
                .author
                .as_ref()
                .map(|a| a.date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "unknown".into());
            out.push_str(&format!(
                "\n    {date} {}",
                truncate_chars(subject, MAX_COMMIT_CHARS)
            ));
        }
    }

    Ok(out)
}

/// Language with the largest byte count in the breakdown.
fn top_language(languages: &HashMap<String, u64>) -> Option<&str> {
    languages
        .iter()
        .max_by_key(|(_, bytes)| **bytes)
        .map(|(name, _)| name.as_str())
}

/// Authenticated GET returning deserialized JSON.
async fn get_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    token: &str,
    url: &str,
) -> Result<T> {
    let response = client
        .get(url)
        .bearer_auth(token)
        .header("Accept", "application/vnd.github+json")
        .send()
        .await
        .map_err(|e| LinkscoutError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkscoutError::Upstream {
            service: "GitHub".into(),
            status: status.as_u16(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| LinkscoutError::Network(format!("malformed payload: {e}")))
}
