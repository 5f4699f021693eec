//! Platform enrichers: best-effort lookups against public platform APIs.
//!
//! Each enricher is a free `lookup` function over `(client, config,
//! identifier)` that returns report text and **never fails**: a network
//! error, a missing credential, or a miss at the remote end all come back
//! as a one-line diagnostic string instead. Enrichers share no state; the
//! read-only [`ResearchConfig`](linkscout_shared::ResearchConfig) carries
//! credentials and API base URLs (overridable in tests).

pub mod codehost;
pub mod community;
pub mod market;
pub mod social;

use linkscout_shared::{LinkscoutError, truncate_chars};

/// Maximum characters of a diagnostic line.
const MAX_DIAG_CHARS: usize = 200;

/// Render an error as a short per-service diagnostic line.
pub(crate) fn diagnostic(service: &str, err: &LinkscoutError) -> String {
    match err {
        LinkscoutError::Upstream { status, .. } => {
            format!("{service}: lookup failed (HTTP {status})")
        }
        _ => truncate_chars(&format!("{service}: lookup failed ({err})"), MAX_DIAG_CHARS),
    }
}
