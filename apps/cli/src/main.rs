//! Linkscout CLI — research crypto projects from a URL.
//!
//! Fetches a project page, enriches detected social/community links
//! against public platform APIs, and prints a heuristic assessment.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
