//! Shared types, error model, and configuration for Linkscout.
//!
//! This crate is the foundation depended on by all other Linkscout crates.
//! It provides:
//! - [`LinkscoutError`] — the unified error type
//! - Domain types ([`ExtractionResult`], [`PlatformLink`], [`ScoreFactor`], [`Verdict`])
//! - Configuration ([`AppConfig`], [`ResearchConfig`], config loading)

pub mod config;
pub mod error;
pub mod text;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, GithubConfig, ResearchConfig, TwitterConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{LinkscoutError, Result};
pub use text::{group_thousands, truncate_chars};
pub use types::{ExtractionResult, Platform, PlatformLink, Polarity, ScoreFactor, Verdict};
