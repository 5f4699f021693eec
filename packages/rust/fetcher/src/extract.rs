//! Link classification and free-text mining.
//!
//! Anchors are classified against a fixed platform allow-list; the rendered
//! text is additionally scanned for `@handle` tokens and `owner/repo`
//! fragments. Text mining is best-effort and will occasionally pick up
//! email-like tokens; that is an accepted approximation.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use linkscout_shared::{Platform, PlatformLink};

/// Handles mined from free text, capped per page.
const MAX_MINED_HANDLES: usize = 3;

/// `owner/repo` fragments mined from free text, capped per page.
const MAX_MINED_REPOS: usize = 2;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches `@handle` tokens: 1–15 word characters after the `@`.
static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]{1,15})\b").expect("handle regex"));

/// Matches `github.com/owner/repo` fragments in plain text.
static REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)").expect("repo regex")
});

// ---------------------------------------------------------------------------
// Anchor classification
// ---------------------------------------------------------------------------

/// Classify a URL by destination platform, or `None` if it is not on the
/// allow-list.
pub fn classify(url: &Url) -> Option<Platform> {
    let host = url.host_str()?.trim_start_matches("www.");

    match host {
        "twitter.com" | "x.com" => Some(Platform::Twitter),
        "github.com" => Some(Platform::Github),
        "discord.gg" => Some(Platform::Discord),
        "discord.com" if url.path().starts_with("/invite") => Some(Platform::Discord),
        "t.me" | "telegram.me" => Some(Platform::Telegram),
        _ if host == "medium.com" || host.ends_with(".medium.com") => Some(Platform::Medium),
        _ => None,
    }
}

/// Scan anchors and classify them, preserving document order and deduping
/// by URL (first occurrence wins).
pub fn extract_platform_links(doc: &Html, base: &Url) -> Vec<PlatformLink> {
    let link_sel = Selector::parse("a[href]").expect("anchor selector");

    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for el in doc.select(&link_sel) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        let Some(platform) = classify(&resolved) else {
            continue;
        };

        let url = resolved.to_string();
        if seen.insert(url.clone()) {
            links.push(PlatformLink { platform, url });
        }
    }

    links
}

// ---------------------------------------------------------------------------
// Free-text mining
// ---------------------------------------------------------------------------

/// Mine `@handle` tokens from rendered text, in order, deduped, capped.
pub fn mine_handles(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut handles = Vec::new();

    for caps in HANDLE_RE.captures_iter(text) {
        let handle = caps[1].to_string();
        if seen.insert(handle.to_lowercase()) {
            handles.push(handle);
            if handles.len() == MAX_MINED_HANDLES {
                break;
            }
        }
    }

    handles
}

/// Mine `github.com/owner/repo` fragments from rendered text, deduped, capped.
pub fn mine_repos(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut repos = Vec::new();

    for caps in REPO_RE.captures_iter(text) {
        let fragment = format!("{}/{}", &caps[1], &caps[2]);
        if seen.insert(fragment.to_lowercase()) {
            repos.push(fragment);
            if repos.len() == MAX_MINED_REPOS {
                break;
            }
        }
    }

    repos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("test url")
    }

    #[test]
    fn classify_platforms() {
        assert_eq!(classify(&url("https://twitter.com/acme")), Some(Platform::Twitter));
        assert_eq!(classify(&url("https://x.com/acme")), Some(Platform::Twitter));
        assert_eq!(classify(&url("https://www.github.com/acme/core")), Some(Platform::Github));
        assert_eq!(classify(&url("https://discord.gg/abc123")), Some(Platform::Discord));
        assert_eq!(
            classify(&url("https://discord.com/invite/abc123")),
            Some(Platform::Discord)
        );
        assert_eq!(classify(&url("https://t.me/acme")), Some(Platform::Telegram));
        assert_eq!(classify(&url("https://blog.medium.com/post")), Some(Platform::Medium));
    }

    #[test]
    fn classify_rejects_other_hosts() {
        assert_eq!(classify(&url("https://example.com/about")), None);
        // discord.com without an invite path is not a community link
        assert_eq!(classify(&url("https://discord.com/developers")), None);
        // substring matches must not fool the host check
        assert_eq!(classify(&url("https://notgithub.com/a/b")), None);
    }

    #[test]
    fn extract_links_dedupes_and_preserves_order() {
        let html = r#"<html><body>
            <a href="https://github.com/acme/core">Code</a>
            <a href="https://twitter.com/acme">Twitter</a>
            <a href="https://github.com/acme/core">Code again</a>
            <a href="/pricing">Pricing</a>
        </body></html>"#;

        let doc = Html::parse_document(html);
        let base = url("https://acme.io/");
        let links = extract_platform_links(&doc, &base);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].platform, Platform::Github);
        assert_eq!(links[1].platform, Platform::Twitter);
    }

    #[test]
    fn extract_links_resolves_relative_hrefs() {
        let html = r#"<a href="//discord.gg/abc">Join</a>"#;
        let doc = Html::parse_document(html);
        let links = extract_platform_links(&doc, &url("https://acme.io/"));

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://discord.gg/abc");
    }

    #[test]
    fn mine_handles_caps_at_three() {
        let text = "Follow @alpha, @bravo, @charlie and @delta for updates. Also @alpha again.";
        let handles = mine_handles(text);
        assert_eq!(handles, vec!["alpha", "bravo", "charlie"]);
    }

    #[test]
    fn mine_handles_email_false_positive_is_accepted() {
        // Email-like tokens match the handle pattern; known approximation.
        let handles = mine_handles("contact us at hello@acme for details");
        assert_eq!(handles, vec!["acme"]);
    }

    #[test]
    fn mine_repos_caps_at_two() {
        let text = "See github.com/acme/core, github.com/acme/sdk and github.com/acme/docs.";
        let repos = mine_repos(text);
        assert_eq!(repos, vec!["acme/core", "acme/sdk"]);
    }
}
