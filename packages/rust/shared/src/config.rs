//! Application configuration for Linkscout.
//!
//! User config lives at `~/.linkscout/linkscout.toml`.
//! CLI flags override config file values, which override defaults.
//! Credentials themselves are never stored in the file — only the names
//! of the environment variables that hold them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LinkscoutError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "linkscout.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".linkscout";

// ---------------------------------------------------------------------------
// Config structs (matching linkscout.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// GitHub settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// Twitter/X settings.
    #[serde(default)]
    pub twitter: TwitterConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum platform links rendered in the page summary.
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Maximum URLs researched per incoming message.
    #[serde(default = "default_max_urls")]
    pub max_urls_per_message: usize,

    /// Maximum characters per outgoing message chunk.
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_links: default_max_links(),
            max_urls_per_message: default_max_urls(),
            chunk_chars: default_chunk_chars(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_max_links() -> usize {
    8
}
fn default_max_urls() -> usize {
    2
}
fn default_chunk_chars() -> usize {
    3800
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Name of the env var holding the API token (never store the token itself).
    #[serde(default = "default_github_token_env")]
    pub token_env: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token_env: default_github_token_env(),
        }
    }
}

fn default_github_token_env() -> String {
    "GITHUB_TOKEN".into()
}

/// `[twitter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Name of the env var holding the bearer token.
    #[serde(default = "default_twitter_bearer_env")]
    pub bearer_env: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            bearer_env: default_twitter_bearer_env(),
        }
    }
}

fn default_twitter_bearer_env() -> String {
    "TWITTER_BEARER_TOKEN".into()
}

// ---------------------------------------------------------------------------
// Research config (runtime, resolved at start-up)
// ---------------------------------------------------------------------------

/// Runtime research configuration, passed by reference into every
/// component. Credentials are resolved from the environment once here;
/// API base URLs are fields so tests can point lookups at mock servers.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Maximum platform links rendered in the page summary.
    pub max_links: usize,
    /// Maximum URLs researched per incoming message.
    pub max_urls_per_message: usize,
    /// Maximum characters per outgoing message chunk.
    pub chunk_chars: usize,
    /// GitHub API token, if configured.
    pub github_token: Option<String>,
    /// Twitter bearer token, if configured.
    pub twitter_bearer: Option<String>,
    /// CoinGecko API base URL.
    pub market_api_base: String,
    /// DeFiLlama API base URL.
    pub tvl_api_base: String,
    /// GitHub API base URL.
    pub github_api_base: String,
    /// Discord API base URL.
    pub discord_api_base: String,
    /// Twitter API base URL.
    pub twitter_api_base: String,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ResearchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.defaults.timeout_secs),
            max_links: config.defaults.max_links,
            max_urls_per_message: config.defaults.max_urls_per_message,
            chunk_chars: config.defaults.chunk_chars,
            github_token: env_non_empty(&config.github.token_env),
            twitter_bearer: env_non_empty(&config.twitter.bearer_env),
            market_api_base: "https://api.coingecko.com".into(),
            tvl_api_base: "https://api.llama.fi".into(),
            github_api_base: "https://api.github.com".into(),
            discord_api_base: "https://discord.com".into(),
            twitter_api_base: "https://api.twitter.com".into(),
        }
    }
}

/// Read an env var, treating empty values as unset.
fn env_non_empty(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => Some(val),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.linkscout/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LinkscoutError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.linkscout/linkscout.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LinkscoutError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| LinkscoutError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LinkscoutError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LinkscoutError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LinkscoutError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
