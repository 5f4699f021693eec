//! Twitter/X profile lookup via the v2 API.
//!
//! Requires a bearer token. Reports public metrics for the handle plus a
//! recent-activity note from the latest page of posts.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use linkscout_shared::{LinkscoutError, ResearchConfig, Result, group_thousands};

use crate::diagnostic;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UserResponse {
    data: Option<UserData>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    username: String,
    public_metrics: PublicMetrics,
}

#[derive(Debug, Deserialize)]
struct PublicMetrics {
    followers_count: u64,
    following_count: u64,
    tweet_count: u64,
    #[serde(default)]
    like_count: u64,
}

#[derive(Debug, Deserialize)]
struct TweetsResponse {
    #[serde(default)]
    data: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    #[allow(dead_code)]
    id: String,
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Look up public profile metrics for a handle or profile URL. Never fails.
pub async fn lookup(client: &Client, cfg: &ResearchConfig, handle: &str) -> String {
    let handle = normalize_handle(handle);
    if handle.is_empty() {
        return "Twitter: no handle to look up".into();
    }

    let Some(bearer) = cfg.twitter_bearer.as_deref() else {
        return "Twitter: not configured (set TWITTER_BEARER_TOKEN)".into();
    };

    match try_lookup(client, cfg, bearer, &handle).await {
        Ok(text) => text,
        Err(LinkscoutError::NotFound { .. }) => format!("Twitter: user @{handle} not found"),
        Err(e) => diagnostic("Twitter", &e),
    }
}

/// Strip a leading `@` and known profile-URL prefixes, keeping only the
/// leading run of handle characters.
pub fn normalize_handle(raw: &str) -> String {
    let mut s = raw.trim();

    for marker in ["twitter.com/", "x.com/"] {
        if let Some(idx) = s.find(marker) {
            s = &s[idx + marker.len()..];
        }
    }

    s.trim_start_matches('@')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(15)
        .collect()
}

async fn try_lookup(
    client: &Client,
    cfg: &ResearchConfig,
    bearer: &str,
    handle: &str,
) -> Result<String> {
    let url = format!(
        "{}/2/users/by/username/{handle}?user.fields=public_metrics",
        cfg.twitter_api_base
    );

    let response = client
        .get(&url)
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| LinkscoutError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkscoutError::Upstream {
            service: "Twitter".into(),
            status: status.as_u16(),
        });
    }

    let user: UserResponse = response
        .json()
        .await
        .map_err(|e| LinkscoutError::Network(format!("malformed user payload: {e}")))?;

    let Some(user) = user.data else {
        return Err(LinkscoutError::not_found(format!("no user '{handle}'")));
    };

    debug!(handle = %user.username, followers = user.public_metrics.followers_count, "profile resolved");

    let metrics = &user.public_metrics;
    let mut out = format!(
        "Twitter @{}: {} followers, {} following, {} tweets, {} likes",
        user.username,
        group_thousands(metrics.followers_count as i64),
        group_thousands(metrics.following_count as i64),
        group_thousands(metrics.tweet_count as i64),
        group_thousands(metrics.like_count as i64),
    );

    // Recent activity is best-effort; a failure here only degrades the note.
    match recent_posts(client, cfg, bearer, &user.id).await {
        Ok(0) => out.push_str("\n  Recent activity: none found"),
        Ok(n) => out.push_str(&format!("\n  Recent activity: {n} posts in the latest page")),
        Err(e) => {
            debug!(error = %e, "recent posts lookup failed");
            out.push_str("\n  Recent activity: unavailable");
        }
    }

    Ok(out)
}

/// Count of posts on the latest page for a user id.
async fn recent_posts(
    client: &Client,
    cfg: &ResearchConfig,
    bearer: &str,
    user_id: &str,
) -> Result<usize> {
    let url = format!(
        "{}/2/users/{user_id}/tweets?max_results=5",
        cfg.twitter_api_base
    );

    let response = client
        .get(&url)
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| LinkscoutError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkscoutError::Upstream {
            service: "Twitter".into(),
            status: status.as_u16(),
        });
    }

    let tweets: TweetsResponse = response
        .json()
        .await
        .map_err(|e| LinkscoutError::Network(format!("malformed tweets payload: {e}")))?;

    Ok(tweets.data.len())
}
