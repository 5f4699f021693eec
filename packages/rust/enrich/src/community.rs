//! Discord community lookup via the public invite-preview endpoint.
//!
//! The invite code is the final path segment of the invite URL (query
//! string stripped). No credential required; the endpoint is public but
//! returns 404 for expired or unknown invites.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use linkscout_shared::{LinkscoutError, ResearchConfig, Result, group_thousands, truncate_chars};

use crate::diagnostic;

/// Server descriptions are clipped to this many characters.
const MAX_DESCRIPTION_CHARS: usize = 100;

/// At most this many feature tags are reported.
const MAX_FEATURES: usize = 3;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct InvitePreview {
    guild: Option<Guild>,
    approximate_member_count: Option<u64>,
    approximate_presence_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Guild {
    name: String,
    description: Option<String>,
    #[serde(default)]
    features: Vec<String>,
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Look up a Discord server behind an invite URL. Never fails.
pub async fn lookup(client: &Client, cfg: &ResearchConfig, invite_url: &str) -> String {
    let code = invite_code(invite_url);
    if code.is_empty() {
        return format!("Discord: no invite code in '{invite_url}'");
    }

    match try_lookup(client, cfg, &code).await {
        Ok(text) => text,
        Err(e) => diagnostic("Discord", &e),
    }
}

/// Final path segment of the invite URL, query string stripped.
fn invite_code(invite_url: &str) -> String {
    let without_query = invite_url.split(['?', '#']).next().unwrap_or("");
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .to_string()
}

async fn try_lookup(client: &Client, cfg: &ResearchConfig, code: &str) -> Result<String> {
    let url = format!(
        "{}/api/v9/invites/{code}?with_counts=true",
        cfg.discord_api_base
    );

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| LinkscoutError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkscoutError::Upstream {
            service: "Discord".into(),
            status: status.as_u16(),
        });
    }

    let preview: InvitePreview = response
        .json()
        .await
        .map_err(|e| LinkscoutError::Network(format!("malformed invite payload: {e}")))?;

    let name = preview
        .guild
        .as_ref()
        .map(|g| g.name.as_str())
        .unwrap_or("Unknown");
    let members = preview.approximate_member_count.unwrap_or(0);
    let online = preview.approximate_presence_count.unwrap_or(0);

    debug!(code, name, members, "invite resolved");

    let mut out = format!(
        "Discord {name}: ~{} members, ~{} online",
        group_thousands(members as i64),
        group_thousands(online as i64),
    );

    if let Some(guild) = &preview.guild {
        if let Some(desc) = guild.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!(
                "\n  About: {}",
                truncate_chars(desc, MAX_DESCRIPTION_CHARS)
            ));
        }
        if !guild.features.is_empty() {
            let tags: Vec<&str> = guild
                .features
                .iter()
                .take(MAX_FEATURES)
                .map(String::as_str)
                .collect();
            out.push_str(&format!("\n  Features: {}", tags.join(", ")));
        }
    }

    Ok(out)
}
