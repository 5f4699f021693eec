//! Error types for Linkscout.
//!
//! Library crates use [`LinkscoutError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Enrichers never surface these errors to callers: each one catches its
//! own failures and substitutes a short diagnostic line in the report.

use std::path::PathBuf;

/// Top-level error type for all Linkscout operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkscoutError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error (timeout, connection failure, body read).
    #[error("network error: {0}")]
    Network(String),

    /// A required credential is missing, so the lookup was never attempted.
    #[error("{service} is not configured")]
    NotConfigured { service: String },

    /// No matching identifier or record at the remote service.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Input could not be parsed into the expected shape.
    #[error("malformed input: {message}")]
    MalformedInput { message: String },

    /// Remote service returned a non-success status.
    #[error("{service} returned HTTP {status}")]
    Upstream { service: String, status: u16 },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LinkscoutError>;

impl LinkscoutError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a not-configured error for a named service.
    pub fn not_configured(service: impl Into<String>) -> Self {
        Self::NotConfigured {
            service: service.into(),
        }
    }

    /// Create a not-found error from any displayable message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound {
            message: msg.into(),
        }
    }

    /// Create a malformed-input error from any displayable message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LinkscoutError::config("missing section [defaults]");
        assert_eq!(err.to_string(), "config error: missing section [defaults]");

        let err = LinkscoutError::not_configured("Twitter");
        assert_eq!(err.to_string(), "Twitter is not configured");

        let err = LinkscoutError::Upstream {
            service: "Discord".into(),
            status: 404,
        };
        assert_eq!(err.to_string(), "Discord returned HTTP 404");
    }

    #[test]
    fn malformed_input_mentions_message() {
        let err = LinkscoutError::malformed("no owner/repo in URL");
        assert!(err.to_string().contains("owner/repo"));
    }
}
