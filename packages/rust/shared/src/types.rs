//! Core domain types for Linkscout research reports.
//!
//! All of these are transient and request-scoped: a research run builds
//! them, renders the final report text, and throws them away. Nothing is
//! cached or shared across requests.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// A destination platform recognized in outbound links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Github,
    Discord,
    Telegram,
    Medium,
}

impl Platform {
    /// Short tag used when rendering links in the page summary.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Github => "github",
            Self::Discord => "discord",
            Self::Telegram => "telegram",
            Self::Medium => "medium",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// ExtractionResult
// ---------------------------------------------------------------------------

/// A classified outbound link found on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformLink {
    /// Destination platform.
    pub platform: Platform,
    /// Full link target.
    pub url: String,
}

/// Everything extracted from a single page fetch. Immutable after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Page title, first heading, or the URL itself. On fetch failure this
    /// holds a truncated error description instead.
    pub title: String,
    /// Classified outbound links, insertion-ordered, deduped by URL.
    pub links: Vec<PlatformLink>,
    /// `@handle` tokens mined from the rendered text.
    pub handles: Vec<String>,
}

impl ExtractionResult {
    /// First link pointing at the given platform, in insertion order.
    pub fn first_link(&self, platform: Platform) -> Option<&PlatformLink> {
        self.links.iter().find(|l| l.platform == platform)
    }

    /// Render the page summary section: title plus up to `max_links` links.
    pub fn summary(&self, max_links: usize) -> String {
        let mut out = format!("Site: {}", self.title);
        for link in self.links.iter().take(max_links) {
            out.push_str(&format!("\n  [{}] {}", link.platform, link.url));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Score factors and verdicts
// ---------------------------------------------------------------------------

/// Direction of a scoring observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

impl Polarity {
    /// Single-character marker used when rendering factors.
    pub fn marker(&self) -> char {
        match self {
            Self::Positive => '+',
            Self::Neutral => '~',
            Self::Negative => '-',
        }
    }
}

/// One discrete observation contributing to the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFactor {
    /// Human-readable description of the observation.
    pub label: String,
    /// Direction of the signal.
    pub polarity: Polarity,
    /// Contribution to the total score.
    pub weight: u32,
}

impl ScoreFactor {
    pub fn positive(label: impl Into<String>, weight: u32) -> Self {
        Self {
            label: label.into(),
            polarity: Polarity::Positive,
            weight,
        }
    }

    pub fn neutral(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            polarity: Polarity::Neutral,
            weight: 0,
        }
    }

    pub fn negative(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            polarity: Polarity::Negative,
            weight: 0,
        }
    }
}

/// Final qualitative label assigned from the accumulated factor weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    VeryHigh,
    High,
    Medium,
    Low,
    /// Some signals detected but total weight is zero.
    Insufficient,
    /// No platform indicators detected at all.
    NoSignals,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::VeryHigh => "very high potential",
            Self::High => "high potential",
            Self::Medium => "medium potential",
            Self::Low => "low potential",
            Self::Insufficient => "insufficient data, some signals",
            Self::NoSignals => "no social links found",
        };
        f.write_str(label)
    }
}
