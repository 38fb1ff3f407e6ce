//! Resumable, rate-limited batch lookup.
//!
//! ```text
//! input list → skip already stored → fetch one → append row / log error
//!                                         └── every N records → checkpoint
//! ```
//!
//! The result CSV is the only state needed to resume: the set of stored
//! charters is rebuilt from it once at startup and passed into the loop.

mod config;

pub use config::BatchConfig;

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::app::{AppError, Result};
use crate::checkpoint::{CheckpointOutcome, Checkpointer};
use crate::domain::{CharterNumber, ErrorEntry, ResultRow};
use crate::fetcher::Fetcher;
use crate::store::Store;

/// Print a progress line after this many processed records.
pub const PROGRESS_EVERY: usize = 10;

/// Counters for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Charters in the input list
    pub total: usize,
    /// Charters that were looked up (or simulated) this run
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Charters already in the output before the run started
    pub already_stored: usize,
    pub checkpoints: usize,
    pub dry_run: bool,
}

impl BatchSummary {
    /// Charters in the output file once the run is over.
    pub fn total_stored(&self) -> usize {
        if self.dry_run {
            self.already_stored
        } else {
            self.already_stored + self.succeeded
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.dry_run { " (dry run)" } else { "" };
        writeln!(f, "Batch complete{}:", mode)?;
        writeln!(f, "  processed: {}", self.processed)?;
        writeln!(f, "  succeeded: {}", self.succeeded)?;
        writeln!(f, "  errors:    {}", self.failed)?;
        writeln!(f, "  skipped:   {}", self.skipped)?;
        write!(
            f,
            "  total stored: {} of {} listed",
            self.total_stored(),
            self.total
        )
    }
}

/// Read the newline-delimited charter list. Blank lines are ignored; any
/// other line that is not a positive integer aborts the run.
pub fn load_charters(path: &Path) -> Result<Vec<CharterNumber>> {
    if !path.is_file() {
        return Err(AppError::InputNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let mut charters = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let charter = line.parse().map_err(|_| AppError::InvalidInputLine {
            path: path.to_path_buf(),
            line: idx + 1,
            value: line.to_string(),
        })?;
        charters.push(charter);
    }

    Ok(charters)
}

pub struct BatchRunner<S: Store> {
    config: BatchConfig,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    checkpointer: Arc<dyn Checkpointer>,
    store: S,
}

impl<S: Store> BatchRunner<S> {
    pub fn new(
        config: BatchConfig,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        checkpointer: Arc<dyn Checkpointer>,
        store: S,
    ) -> Self {
        Self {
            config,
            fetcher,
            checkpointer,
            store,
        }
    }

    /// Load the input list and the stored set, then process every charter.
    pub async fn run(&self) -> Result<BatchSummary> {
        self.config.validate()?;
        let charters = load_charters(&self.config.input)?;
        let stored = self.store.processed()?;

        tracing::info!(
            "Loaded {} charters from {}, {} already stored in {}",
            charters.len(),
            self.config.input.display(),
            stored.len(),
            self.config.output.display()
        );

        self.process(&charters, stored).await
    }

    /// Process `charters` in order, skipping anything in `stored`.
    pub async fn process(
        &self,
        charters: &[CharterNumber],
        mut stored: HashSet<CharterNumber>,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary {
            total: charters.len(),
            already_stored: stored.len(),
            dry_run: self.config.dry_run,
            ..Default::default()
        };
        let rate_limit = self.config.rate_limit();
        let mut pending = 0;
        let mut live_fetches = 0;

        for &charter in charters {
            let below_start = self.config.start_from.is_some_and(|start| charter < start);
            if below_start || stored.contains(&charter) {
                summary.skipped += 1;
                continue;
            }

            summary.processed += 1;

            if self.config.dry_run {
                summary.succeeded += 1;
                stored.insert(charter);
                println!("  ~ {} (dry run)", charter);
                self.report_progress(&summary);
                continue;
            }

            if live_fetches > 0 && !rate_limit.is_zero() {
                tokio::time::sleep(rate_limit).await;
            }
            live_fetches += 1;

            match self.fetcher.fetch(charter).await {
                Ok(website) => {
                    let row = ResultRow::new(charter, website);
                    self.store.append_result(&row)?;
                    if let Err(e) = self.store.record_progress(charter) {
                        tracing::warn!("Failed to update progress marker: {}", e);
                    }
                    stored.insert(charter);
                    summary.succeeded += 1;
                    println!("  + {} {}", charter, row.website);
                }
                Err(e) => {
                    tracing::debug!("Lookup failed for charter {}: {:?}", charter, e);
                    self.store
                        .append_error(&ErrorEntry::new(charter, e.to_string()))?;
                    summary.failed += 1;
                    eprintln!("  ! {} {}", charter, e);
                }
            }

            pending += 1;
            if pending >= self.config.commit_interval {
                self.checkpoint(pending, &mut summary).await;
                pending = 0;
            }

            self.report_progress(&summary);
        }

        if pending > 0 {
            self.checkpoint(pending, &mut summary).await;
        }

        Ok(summary)
    }

    async fn checkpoint(&self, pending: usize, summary: &mut BatchSummary) {
        match self.checkpointer.checkpoint(pending).await {
            Ok(CheckpointOutcome::PublishFailed { last_error, .. }) => {
                summary.checkpoints += 1;
                eprintln!("Warning: checkpoint not published: {}", last_error);
            }
            Ok(outcome) => {
                summary.checkpoints += 1;
                tracing::debug!("Checkpoint after {} records: {:?}", pending, outcome);
            }
            Err(e) => {
                tracing::warn!("Checkpoint failed, continuing: {}", e);
                eprintln!("Warning: checkpoint failed: {}", e);
            }
        }
    }

    fn report_progress(&self, summary: &BatchSummary) {
        if summary.processed % PROGRESS_EVERY == 0 {
            println!(
                "Progress: {} processed ({} ok, {} errors, {} skipped)",
                summary.processed, summary.succeeded, summary.failed, summary.skipped
            );
        }
    }
}
