//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Foresight - Sanity-check sales forecasts before anyone acts on them
#[derive(Parser)]
#[command(name = "foresight")]
#[command(about = "Forecast sanity checks, quality scoring and executive summaries", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Threshold config file (defaults to the data-dir override, then built-ins)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print reports as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the four forecast sanity checks
    Check {
        /// Forecast bundle (JSON)
        file: PathBuf,
    },

    /// Score the bundle's data profile
    Quality {
        /// Forecast bundle (JSON) with a data_profile section
        file: PathBuf,
    },

    /// Show the risk band and safety-stock guidance for a MAPE value
    Risk {
        /// Mean absolute percentage error, in percent (6.8 = 6.8%)
        #[arg(long)]
        mape: f64,
    },

    /// Generate the executive summary
    Summarize {
        /// Forecast bundle (JSON)
        file: PathBuf,

        /// Baseline revenue to compare against (overrides the bundle)
        #[arg(long)]
        baseline: Option<f64>,

        /// Average unit price (overrides the bundle)
        #[arg(long)]
        price: Option<f64>,
    },

    /// Run everything for one or more bundles
    Evaluate {
        /// Forecast bundles (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the effective thresholds as TOML
    Config,

    /// Print the JSON Schema of the forecast bundle
    Schema,
}
