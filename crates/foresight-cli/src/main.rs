//! Foresight CLI - Forecast sanity checks and executive summaries
//!
//! Usage:
//!   foresight check bundle.json        Run sanity checks
//!   foresight quality bundle.json      Score the data profile
//!   foresight risk --mape 6.8          Risk band for a MAPE value
//!   foresight summarize bundle.json    Executive summary
//!   foresight evaluate a.json b.json   Full report per bundle

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let thresholds = commands::load_thresholds(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { file } => commands::cmd_check(&file, &thresholds, cli.json),
        Commands::Quality { file } => commands::cmd_quality(&file, &thresholds, cli.json),
        Commands::Risk { mape } => commands::cmd_risk(mape, &thresholds, cli.json),
        Commands::Summarize {
            file,
            baseline,
            price,
        } => commands::cmd_summarize(&file, baseline, price, &thresholds, cli.json),
        Commands::Evaluate { files } => commands::cmd_evaluate(&files, &thresholds, cli.json),
        Commands::Config => commands::cmd_config(&thresholds),
        Commands::Schema => commands::cmd_schema(),
    }
}
