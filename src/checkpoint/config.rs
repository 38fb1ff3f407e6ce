use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::checkpoint::RetryPolicy;

/// Configuration for periodic git snapshots of the output files
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Commit and push the output files during a batch (default: true)
    pub enabled: bool,

    /// Work tree to run git in; `None` uses the current directory
    pub repo_dir: Option<PathBuf>,

    /// Remote to push to; `None` uses the branch's upstream
    pub remote: Option<String>,

    /// Branch to push; only used together with `remote`
    pub branch: Option<String>,

    /// Push attempts before giving up (default: 4)
    pub max_attempts: u32,

    /// Delay after the first failed push, doubled on each retry (default: 2)
    pub initial_backoff_secs: u64,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repo_dir: None,
            remote: None,
            branch: None,
            max_attempts: 4,
            initial_backoff_secs: 2,
        }
    }
}

impl CheckpointConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_secs(self.initial_backoff_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_policy() {
        let policy = CheckpointConfig::default().retry_policy();
        assert_eq!(policy, RetryPolicy::default());
    }
}
