pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cuweb")]
#[command(about = "Collect credit union websites from the NCUA API", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/cuweb/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up the website for a single charter number
    Fetch {
        /// Charter number (positive integer)
        charter: String,
    },
    /// Look up every charter in a list, appending results to a CSV
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub struct BatchArgs {
    /// File with one charter number per line
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Result CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Error log
    #[arg(long)]
    pub error_log: Option<PathBuf>,

    /// Progress marker file
    #[arg(long)]
    pub progress_file: Option<PathBuf>,

    /// Seconds to wait between requests
    #[arg(long, value_name = "SECONDS")]
    pub rate_limit: Option<f64>,

    /// Commit and push after this many processed records
    #[arg(long, value_name = "COUNT")]
    pub commit_interval: Option<usize>,

    /// Show what would be fetched without touching the network or any file
    #[arg(long)]
    pub dry_run: bool,

    /// Resume from the existing output (always on; accepted for compatibility)
    #[arg(long)]
    pub resume: bool,

    /// Skip charter numbers below this one
    #[arg(long, value_name = "CHARTER")]
    pub start_from: Option<String>,
}
