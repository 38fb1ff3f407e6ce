use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::app::{AppError, Result};
use crate::domain::CharterNumber;

/// Configuration for a batch run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Newline-delimited list of charter numbers
    pub input: PathBuf,

    /// Result CSV, also the source of truth for resuming
    pub output: PathBuf,

    /// Per-charter failures
    pub error_log: PathBuf,

    /// Last charter stored, for humans only
    pub progress_file: PathBuf,

    /// Seconds to wait between live requests (default: 1.0)
    pub rate_limit_secs: f64,

    /// Checkpoint after this many processed records (default: 50)
    pub commit_interval: usize,

    /// Simulate the run without network access or writes
    #[serde(skip)]
    pub dry_run: bool,

    /// Skip charters numerically below this one
    #[serde(skip)]
    pub start_from: Option<CharterNumber>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("charter_numbers.txt"),
            output: PathBuf::from("credit_union_websites.csv"),
            error_log: PathBuf::from("scrape_errors.log"),
            progress_file: PathBuf::from(".scrape_progress"),
            rate_limit_secs: 1.0,
            commit_interval: 50,
            dry_run: false,
            start_from: None,
        }
    }
}

impl BatchConfig {
    pub fn rate_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.rate_limit_secs).unwrap_or(Duration::ZERO)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.rate_limit_secs.is_finite() || self.rate_limit_secs < 0.0 {
            return Err(AppError::Config(format!(
                "rate limit must be a non-negative number of seconds, got {}",
                self.rate_limit_secs
            )));
        }
        if self.commit_interval == 0 {
            return Err(AppError::Config(
                "commit interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
