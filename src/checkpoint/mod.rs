//! Periodic publication of the batch output.
//!
//! ```text
//! BatchRunner ── every N records ──> Checkpointer ──> git add / commit / push
//! ```
//!
//! A checkpoint never fails the batch: the runner downgrades any error here
//! to a warning, and the files on disk are left untouched either way.

mod config;
mod git;
mod retry;

pub use config::CheckpointConfig;
pub use git::GitCheckpointer;
pub use retry::RetryPolicy;

use async_trait::async_trait;

use crate::app::Result;

/// What a checkpoint ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointOutcome {
    /// Nothing staged differed from the last snapshot
    NothingToCommit,
    /// Snapshot committed and pushed
    Published { attempts: u32 },
    /// Snapshot committed locally, push gave up
    PublishFailed { attempts: u32, last_error: String },
    /// Checkpointing is turned off
    Disabled,
}

#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Snapshot the output files; `pending` is the number of records
    /// processed since the previous checkpoint.
    async fn checkpoint(&self, pending: usize) -> Result<CheckpointOutcome>;
}

/// Checkpointer used when `checkpoint.enabled = false`
pub struct NoopCheckpointer;

#[async_trait]
impl Checkpointer for NoopCheckpointer {
    async fn checkpoint(&self, _pending: usize) -> Result<CheckpointOutcome> {
        Ok(CheckpointOutcome::Disabled)
    }
}
