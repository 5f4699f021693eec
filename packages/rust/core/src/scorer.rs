//! Heuristic scorer: keyword and pattern matching over aggregated report
//! text.
//!
//! A pure function of the text: the same input always yields the same
//! verdict and factor list. Rules are applied independently and their
//! weights summed; factor order is fixed (social, code-host, community,
//! market, dev-activity) so reports are reproducible.

use std::sync::LazyLock;

use regex::Regex;

use linkscout_shared::{ScoreFactor, Verdict};

// ---------------------------------------------------------------------------
// Patterns (numeric-before-keyword, thousands separators allowed)
// ---------------------------------------------------------------------------

static FOLLOWERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d,]+)\s+followers").expect("followers regex"));

static STARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d,]+)\s+stars").expect("stars regex"));

static MEMBERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d,]+)\s+members").expect("members regex"));

/// Outcome of scoring one aggregated report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreOutcome {
    /// Final qualitative label.
    pub verdict: Verdict,
    /// Observations in detection order.
    pub factors: Vec<ScoreFactor>,
}

/// Score aggregated report text. Pure and deterministic.
pub fn score(text: &str) -> ScoreOutcome {
    let lower = text.to_lowercase();
    let mut factors: Vec<ScoreFactor> = Vec::new();

    // Social following
    if lower.contains("twitter") {
        if let Some(followers) = first_count(&FOLLOWERS_RE, &lower) {
            factors.push(if followers > 100_000 {
                ScoreFactor::positive("strong social following", 2)
            } else if followers > 10_000 {
                ScoreFactor::positive("moderate social following", 1)
            } else {
                ScoreFactor::negative("small social following")
            });
        }
    }

    // Code-host traction
    if lower.contains("github") {
        if let Some(stars) = first_count(&STARS_RE, &lower) {
            factors.push(if stars > 1_000 {
                ScoreFactor::positive("widely starred repository", 2)
            } else if stars > 100 {
                ScoreFactor::positive("moderately starred repository", 1)
            } else {
                ScoreFactor::negative("little code-host traction")
            });
        }
    }

    // Chat community size
    if lower.contains("discord") {
        if let Some(members) = first_count(&MEMBERS_RE, &lower) {
            factors.push(if members > 50_000 {
                ScoreFactor::positive("large chat community", 2)
            } else if members > 10_000 {
                ScoreFactor::positive("mid-sized chat community", 1)
            } else {
                ScoreFactor::negative("small chat community")
            });
        }
    }

    // Token trading status
    if lower.contains("market cap") || lower.contains("price:") {
        factors.push(ScoreFactor::positive("token is actively traded", 1));
    } else if lower.contains("no market data found") {
        factors.push(ScoreFactor::neutral("no token data, possible airdrop"));
    }

    // Development activity
    if lower.contains("recent commits") {
        factors.push(ScoreFactor::positive("recent development activity", 1));
    }

    let verdict = if factors.is_empty() {
        Verdict::NoSignals
    } else {
        let total: u32 = factors.iter().map(|f| f.weight).sum();
        match total {
            5.. => Verdict::VeryHigh,
            3..=4 => Verdict::High,
            2 => Verdict::Medium,
            1 => Verdict::Low,
            0 => Verdict::Insufficient,
        }
    };

    ScoreOutcome { verdict, factors }
}

/// Render the scoring section of the report.
pub fn render(outcome: &ScoreOutcome) -> String {
    let mut out = format!("Assessment: {}", outcome.verdict);
    if !outcome.factors.is_empty() {
        out.push_str("\nFactors:");
        for factor in &outcome.factors {
            out.push_str(&format!(
                "\n  [{}{}] {}",
                factor.polarity.marker(),
                factor.weight,
                factor.label
            ));
        }
    }
    out
}

/// First match of a numeric-before-keyword pattern, commas stripped.
fn first_count(re: &Regex, text: &str) -> Option<u64> {
    let caps = re.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkscout_shared::Polarity;

    #[test]
    fn scoring_is_deterministic() {
        let text = "Twitter @a: 120,000 followers\n\nGitHub a/b: 1,500 stars";
        let first = score(text);
        let second = score(text);
        assert_eq!(first, second);
    }

    #[test]
    fn no_indicators_yields_no_signals() {
        let outcome = score("Site: something entirely unrelated");
        assert_eq!(outcome.verdict, Verdict::NoSignals);
        assert!(outcome.factors.is_empty());
        assert_eq!(render(&outcome), "Assessment: no social links found");
    }

    #[test]
    fn follower_tiers() {
        let outcome = score("Twitter @a: 120,000 followers");
        assert_eq!(outcome.factors[0].label, "strong social following");
        assert_eq!(outcome.factors[0].weight, 2);

        let outcome = score("Twitter @a: 20,000 followers");
        assert_eq!(outcome.factors[0].label, "moderate social following");
        assert_eq!(outcome.factors[0].weight, 1);

        let outcome = score("Twitter @a: 500 followers");
        assert_eq!(outcome.factors[0].polarity, Polarity::Negative);
        assert_eq!(outcome.factors[0].weight, 0);
    }

    #[test]
    fn indicator_without_count_adds_no_factor() {
        // "twitter" appears but no follower count is extractable
        let outcome = score("Follow us on Twitter!");
        assert!(outcome.factors.is_empty());
        assert_eq!(outcome.verdict, Verdict::NoSignals);
    }

    #[test]
    fn threshold_boundary_two_vs_three() {
        // weight exactly 2 -> medium
        let outcome = score("GitHub a/b: 1,500 stars");
        assert_eq!(total(&outcome), 2);
        assert_eq!(outcome.verdict, Verdict::Medium);

        // weight exactly 3 -> high
        let outcome = score("GitHub a/b: 1,500 stars\nPrice: $0.100000");
        assert_eq!(total(&outcome), 3);
        assert_eq!(outcome.verdict, Verdict::High);
    }

    #[test]
    fn threshold_boundary_four_vs_five() {
        // weight exactly 4 -> still high
        let outcome = score("GitHub a/b: 1,500 stars\nDiscord X: ~60,000 members");
        assert_eq!(total(&outcome), 4);
        assert_eq!(outcome.verdict, Verdict::High);

        // weight exactly 5 -> very high
        let outcome =
            score("GitHub a/b: 1,500 stars\nDiscord X: ~60,000 members\nPrice: $0.100000");
        assert_eq!(total(&outcome), 5);
        assert_eq!(outcome.verdict, Verdict::VeryHigh);
    }

    #[test]
    fn weight_one_is_low() {
        let outcome = score("Market cap: $1,000,000");
        assert_eq!(total(&outcome), 1);
        assert_eq!(outcome.verdict, Verdict::Low);
    }

    #[test]
    fn zero_weight_factors_yield_insufficient() {
        let outcome = score("Market data: no market data found for 'x'");
        assert_eq!(outcome.factors.len(), 1);
        assert_eq!(outcome.factors[0].polarity, Polarity::Neutral);
        assert_eq!(outcome.verdict, Verdict::Insufficient);
    }

    #[test]
    fn spec_scenario_two_strong_factors() {
        // 1,500-star repo + 60,000-member server: two weight-2 factors,
        // total 4, high potential.
        let text = "Site: Acme\n\n\
                    GitHub acme/core: 1,500 stars, 210 forks, 42 open issues\n\n\
                    Discord Acme: ~60,000 members, ~4,200 online";
        let outcome = score(text);

        let weights: Vec<u32> = outcome.factors.iter().map(|f| f.weight).collect();
        assert_eq!(weights, vec![2, 2]);
        assert_eq!(outcome.verdict, Verdict::High);
    }

    #[test]
    fn dev_activity_factor() {
        let outcome = score("GitHub a/b: 50 stars\n  Recent commits:\n    2024-05-01 Fix");
        // negative star factor plus dev activity
        assert_eq!(outcome.factors.len(), 2);
        assert_eq!(outcome.factors[1].label, "recent development activity");
        assert_eq!(outcome.verdict, Verdict::Low);
    }

    #[test]
    fn factor_order_is_fixed() {
        let text = "Recent commits: yes\n\
                    Discord X: ~60,000 members\n\
                    GitHub a/b: 1,500 stars\n\
                    Twitter @a: 120,000 followers\n\
                    Market cap: $5";
        let labels: Vec<String> = score(text).factors.into_iter().map(|f| f.label).collect();
        assert_eq!(
            labels,
            vec![
                "strong social following",
                "widely starred repository",
                "large chat community",
                "token is actively traded",
                "recent development activity",
            ]
        );
    }

    #[test]
    fn render_includes_markers_and_weights() {
        let outcome = score("GitHub a/b: 1,500 stars\nPrice: $0.100000");
        let text = render(&outcome);
        assert!(text.starts_with("Assessment: high potential"));
        assert!(text.contains("[+2] widely starred repository"));
        assert!(text.contains("[+1] token is actively traded"));
    }

    fn total(outcome: &ScoreOutcome) -> u32 {
        outcome.factors.iter().map(|f| f.weight).sum()
    }
}
