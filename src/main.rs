//! Canvas API CLI
//!
//! Command-line interface for ad-hoc API calls

use canvas_api::cli::{Cli, Runner};
use canvas_api::is_rate_limit;
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run() {
        eprintln!("Error: {e:#}");
        if is_rate_limit(&*e) {
            tracing::warn!("Request quota exhausted; wait before sending more requests");
            std::process::exit(2);
        }
        std::process::exit(1);
    }
}
