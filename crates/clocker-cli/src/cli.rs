//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Work-time compliance checker.
///
/// Reads day entries from a JSON file and checks them against working-time
/// rules: daily maximum, required breaks and rest between days.
#[derive(Debug, Parser)]
#[command(name = "clocker", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check every day entry in a file against the segment rules.
    Validate {
        /// JSON file holding an array of day entries.
        file: PathBuf,
    },

    /// Compute compliance statistics for a period.
    Stats(StatsArgs),

    /// Show the effective compliance settings.
    Config,
}

/// Period selection for `clocker stats`.
///
/// Without a period option the range spans the first to the last entry.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// JSON file holding an array of day entries.
    pub file: PathBuf,

    /// A month, as YYYY-MM.
    #[arg(long, conflicts_with_all = ["year", "from", "to"])]
    pub month: Option<String>,

    /// A whole year.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub year: Option<i32>,

    /// First date of a custom range (YYYY-MM-DD).
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last date of a custom range, inclusive.
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
