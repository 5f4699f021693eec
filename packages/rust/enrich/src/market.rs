//! Market data lookup via the CoinGecko and DeFiLlama public APIs.
//!
//! Two-step on the CoinGecko side: resolve the symbol to a canonical coin
//! id through the search endpoint (first match wins), then fetch price,
//! market cap, 24h volume and 24h change for that id. A TVL line from
//! DeFiLlama's protocol listing is appended when a protocol carries the
//! same symbol. No credential required; the two lookups fail
//! independently.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use linkscout_shared::{LinkscoutError, ResearchConfig, Result, group_thousands};

use crate::diagnostic;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
struct SearchCoin {
    id: String,
    name: String,
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct PriceEntry {
    usd: Option<f64>,
    usd_market_cap: Option<f64>,
    usd_24h_vol: Option<f64>,
    usd_24h_change: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Protocol {
    #[serde(default)]
    symbol: Option<String>,
    tvl: Option<f64>,
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Look up market data for a (speculative) token symbol. Never fails.
pub async fn lookup(client: &Client, cfg: &ResearchConfig, symbol: &str) -> String {
    if symbol.is_empty() {
        return "Market data: no symbol to look up".into();
    }

    let mut out = match try_lookup(client, cfg, symbol).await {
        Ok(text) => text,
        Err(LinkscoutError::NotFound { .. }) => {
            format!("Market data: no market data found for '{symbol}'")
        }
        Err(e) => diagnostic("Market data", &e),
    };

    // TVL is independent of the price lookup; a protocol with no traded
    // token can still carry locked value.
    match protocol_tvl(client, cfg, symbol).await {
        Ok(Some(tvl)) => {
            out.push_str(&format!("\n  TVL: ${}", group_thousands(tvl.round() as i64)));
        }
        Ok(None) => {}
        Err(e) => {
            out.push('\n');
            out.push_str(&diagnostic("DeFiLlama", &e));
        }
    }

    out
}

async fn try_lookup(client: &Client, cfg: &ResearchConfig, symbol: &str) -> Result<String> {
    let coin = search_coin(client, cfg, symbol).await?;
    debug!(symbol, coin_id = %coin.id, "resolved market symbol");

    let url = format!(
        "{}/api/v3/simple/price?ids={}&vs_currencies=usd\
         &include_market_cap=true&include_24hr_vol=true&include_24hr_change=true",
        cfg.market_api_base, coin.id
    );

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| LinkscoutError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkscoutError::Upstream {
            service: "CoinGecko".into(),
            status: status.as_u16(),
        });
    }

    let prices: HashMap<String, PriceEntry> = response
        .json()
        .await
        .map_err(|e| LinkscoutError::Network(format!("malformed price payload: {e}")))?;

    let entry = prices
        .get(&coin.id)
        .ok_or_else(|| LinkscoutError::not_found(format!("no price entry for '{}'", coin.id)))?;

    Ok(format!(
        "Market data for {} ({}):\n  \
         Price: ${:.6}\n  \
         Market cap: ${}\n  \
         Volume 24h: ${}\n  \
         Change 24h: {:.2}%",
        coin.name,
        coin.symbol.to_uppercase(),
        entry.usd.unwrap_or(0.0),
        group_thousands(entry.usd_market_cap.unwrap_or(0.0).round() as i64),
        group_thousands(entry.usd_24h_vol.unwrap_or(0.0).round() as i64),
        entry.usd_24h_change.unwrap_or(0.0),
    ))
}

/// Resolve a symbol through the search endpoint; first match wins.
async fn search_coin(client: &Client, cfg: &ResearchConfig, symbol: &str) -> Result<SearchCoin> {
    let url = format!("{}/api/v3/search?query={}", cfg.market_api_base, symbol);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| LinkscoutError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkscoutError::Upstream {
            service: "CoinGecko".into(),
            status: status.as_u16(),
        });
    }

    let search: SearchResponse = response
        .json()
        .await
        .map_err(|e| LinkscoutError::Network(format!("malformed search payload: {e}")))?;

    search
        .coins
        .into_iter()
        .next()
        .ok_or_else(|| LinkscoutError::not_found(format!("no coin matching '{symbol}'")))
}

/// Total value locked for the first protocol whose symbol matches,
/// case-insensitively. `None` when no protocol carries the symbol.
async fn protocol_tvl(client: &Client, cfg: &ResearchConfig, symbol: &str) -> Result<Option<f64>> {
    let url = format!("{}/protocols", cfg.tvl_api_base);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| LinkscoutError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LinkscoutError::Upstream {
            service: "DeFiLlama".into(),
            status: status.as_u16(),
        });
    }

    let protocols: Vec<Protocol> = response
        .json()
        .await
        .map_err(|e| LinkscoutError::Network(format!("malformed protocols payload: {e}")))?;

    Ok(protocols
        .into_iter()
        .find(|p| {
            p.symbol
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(symbol))
        })
        .map(|p| p.tvl.unwrap_or(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cfg_for(server: &MockServer) -> ResearchConfig {
        let mut cfg = ResearchConfig::default();
        cfg.market_api_base = server.uri();
        cfg.tvl_api_base = server.uri();
        cfg
    }

    async fn mount_protocols(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/protocols"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn lookup_formats_price_with_six_decimals() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/search"))
            .and(query_param("query", "acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "coins": [
                    {"id": "acme-protocol", "name": "Acme Protocol", "symbol": "acme"},
                    {"id": "acme-classic", "name": "Acme Classic", "symbol": "acmec"}
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "acme-protocol": {
                    "usd": 0.1234,
                    "usd_market_cap": 12345678.9,
                    "usd_24h_vol": 987654.3,
                    "usd_24h_change": -1.2345
                }
            })))
            .mount(&server)
            .await;
        mount_protocols(&server, serde_json::json!([])).await;

        let client = Client::new();
        let text = lookup(&client, &cfg_for(&server), "acme").await;

        // First search match wins
        assert!(text.contains("Acme Protocol (ACME)"));
        assert!(text.contains("Price: $0.123400"));
        assert!(text.contains("Market cap: $12,345,679"));
        assert!(text.contains("Volume 24h: $987,654"));
        assert!(text.contains("Change 24h: -1.23%"));
        // No protocol matched, so no TVL line
        assert!(!text.contains("TVL"));
    }

    #[tokio::test]
    async fn lookup_no_match_returns_fixed_string() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"coins": []})),
            )
            .mount(&server)
            .await;
        mount_protocols(&server, serde_json::json!([])).await;

        let client = Client::new();
        let text = lookup(&client, &cfg_for(&server), "nosuchtoken").await;
        assert_eq!(text, "Market data: no market data found for 'nosuchtoken'");
    }

    #[tokio::test]
    async fn lookup_upstream_error_becomes_diagnostic() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/search"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        mount_protocols(&server, serde_json::json!([])).await;

        let client = Client::new();
        let text = lookup(&client, &cfg_for(&server), "acme").await;
        assert_eq!(text, "Market data: lookup failed (HTTP 429)");
    }

    #[tokio::test]
    async fn lookup_appends_tvl_for_matching_protocol() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"coins": []})),
            )
            .mount(&server)
            .await;
        mount_protocols(
            &server,
            serde_json::json!([
                {"name": "Other", "symbol": "OTHER", "tvl": 1.0},
                {"name": "Acme", "symbol": "ACME", "tvl": 45678901.4}
            ]),
        )
        .await;

        let client = Client::new();
        let text = lookup(&client, &cfg_for(&server), "acme").await;

        // Symbol match is case-insensitive; TVL rides along even when no
        // coin is traded.
        assert!(text.contains("no market data found for 'acme'"));
        assert!(text.contains("TVL: $45,678,901"));
    }

    #[tokio::test]
    async fn tvl_failure_does_not_mask_market_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "coins": [{"id": "acme", "name": "Acme", "symbol": "acme"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "acme": {"usd": 1.0, "usd_market_cap": 1000.0, "usd_24h_vol": 10.0,
                         "usd_24h_change": 0.5}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/protocols"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = Client::new();
        let text = lookup(&client, &cfg_for(&server), "acme").await;

        assert!(text.contains("Price: $1.000000"));
        assert!(text.contains("DeFiLlama: lookup failed (HTTP 500)"));
    }

    #[tokio::test]
    async fn lookup_empty_symbol_short_circuits() {
        // No server needed; must not attempt a network call.
        let client = Client::new();
        let text = lookup(&client, &ResearchConfig::default(), "").await;
        assert_eq!(text, "Market data: no symbol to look up");
    }
}
