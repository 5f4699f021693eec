//! Core research pipeline and heuristic scoring for Linkscout.
//!
//! This crate ties together the page fetcher and the platform enrichers
//! into the end-to-end `research` workflow, scores the aggregated report
//! text, and exposes the message-handling surface used by conversation
//! front-ends.

pub mod message;
pub mod pipeline;
pub mod scorer;

pub use message::{chunk_text, handle_message};
pub use pipeline::{ResearchProgress, SilentProgress, research};
pub use scorer::{ScoreOutcome, render, score};
