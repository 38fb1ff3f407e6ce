use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use chrono::Utc;
use tokio::process::Command;

use crate::app::{AppError, Result};
use crate::checkpoint::{CheckpointConfig, CheckpointOutcome, Checkpointer, RetryPolicy};
use crate::store::csv::format_timestamp;

/// Commits the output files to the enclosing git work tree and pushes.
///
/// Relative paths are taken relative to `repo_dir` when one is configured.
pub struct GitCheckpointer {
    repo_dir: Option<PathBuf>,
    paths: Vec<PathBuf>,
    remote: Option<String>,
    branch: Option<String>,
    retry: RetryPolicy,
}

impl GitCheckpointer {
    pub fn new(config: &CheckpointConfig, paths: Vec<PathBuf>) -> Self {
        Self {
            repo_dir: config.repo_dir.clone(),
            paths,
            remote: config.remote.clone(),
            branch: config.branch.clone(),
            retry: config.retry_policy(),
        }
    }

    pub fn commit_message(pending: usize) -> String {
        format!(
            "Auto-commit: {} credit union websites scraped ({})",
            pending,
            format_timestamp(&Utc::now())
        )
    }

    pub fn push_args(&self) -> Vec<String> {
        let mut args = vec!["push".to_string()];
        if let Some(remote) = &self.remote {
            args.push(remote.clone());
            if let Some(branch) = &self.branch {
                args.push(branch.clone());
            }
        }
        args
    }

    fn existing_paths(&self) -> Vec<&Path> {
        self.paths
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| match &self.repo_dir {
                Some(dir) => dir.join(p).exists(),
                None => p.exists(),
            })
            .collect()
    }

    async fn git<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new("git");
        command.args(args);
        command.kill_on_drop(true);
        if let Some(dir) = &self.repo_dir {
            command.current_dir(dir);
        }

        command
            .output()
            .await
            .map_err(|e| AppError::Checkpoint(format!("Failed to run git: {}", e)))
    }

    async fn git_ok<I, S>(&self, what: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.git(args).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(AppError::Checkpoint(format!(
                "git {} failed: {}",
                what,
                stderr_text(&output)
            )))
        }
    }
}

#[async_trait]
impl Checkpointer for GitCheckpointer {
    async fn checkpoint(&self, pending: usize) -> Result<CheckpointOutcome> {
        let paths = self.existing_paths();
        if paths.is_empty() {
            return Ok(CheckpointOutcome::NothingToCommit);
        }

        let mut add_args = vec![OsStr::new("add"), OsStr::new("--")];
        add_args.extend(paths.iter().map(|p| p.as_os_str()));
        self.git_ok("add", add_args).await?;

        // `diff --cached --quiet` exits 0 when nothing is staged and 1 when something is
        let mut diff_args = vec![
            OsStr::new("diff"),
            OsStr::new("--cached"),
            OsStr::new("--quiet"),
            OsStr::new("--"),
        ];
        diff_args.extend(paths.iter().map(|p| p.as_os_str()));
        let diff = self.git(diff_args).await?;
        match diff.status.code() {
            Some(0) => {
                tracing::info!("Checkpoint: no changes to commit");
                return Ok(CheckpointOutcome::NothingToCommit);
            }
            Some(1) => {}
            _ => {
                return Err(AppError::Checkpoint(format!(
                    "git diff failed: {}",
                    stderr_text(&diff)
                )))
            }
        }

        let message = Self::commit_message(pending);
        let mut commit_args = vec![
            OsStr::new("commit"),
            OsStr::new("-m"),
            OsStr::new(message.as_str()),
            OsStr::new("--"),
        ];
        commit_args.extend(paths.iter().map(|p| p.as_os_str()));
        self.git_ok("commit", commit_args).await?;
        tracing::info!("Checkpoint: committed {} records", pending);

        let push_args = self.push_args();
        let pushed = self
            .retry
            .retry("git push", || self.git_ok("push", push_args.iter()))
            .await;

        match pushed {
            Ok(((), attempts)) => {
                tracing::info!("Checkpoint: pushed after {} attempt(s)", attempts);
                Ok(CheckpointOutcome::Published { attempts })
            }
            Err(e) => {
                let attempts = self.retry.max_attempts;
                tracing::warn!(
                    "Checkpoint: push failed after {} attempts, data kept locally: {}",
                    attempts,
                    e
                );
                Ok(CheckpointOutcome::PublishFailed {
                    attempts,
                    last_error: e.to_string(),
                })
            }
        }
    }
}

fn stderr_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("exit status {}", output.status)
    } else {
        stderr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command as StdCommand;
    use tempfile::TempDir;

    fn git_available() -> bool {
        StdCommand::new("git")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    fn run_git(dir: &Path, args: &[&str]) -> String {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(output.status.success(), "git {:?}: {:?}", args, output);
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn init_repo(dir: &Path) {
        run_git(dir, &["init", "--quiet"]);
        run_git(dir, &["config", "user.email", "batch@example.org"]);
        run_git(dir, &["config", "user.name", "Batch"]);
        run_git(dir, &["config", "commit.gpgsign", "false"]);
    }

    fn commit_count(dir: &Path) -> usize {
        run_git(dir, &["rev-list", "--all", "--count"])
            .trim()
            .parse()
            .unwrap()
    }

    fn repo_config(dir: &Path) -> CheckpointConfig {
        CheckpointConfig {
            repo_dir: Some(dir.to_path_buf()),
            max_attempts: 2,
            initial_backoff_secs: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_push_args_default_upstream() {
        let checkpointer = GitCheckpointer::new(&CheckpointConfig::default(), vec![]);
        assert_eq!(checkpointer.push_args(), vec!["push"]);
    }

    #[test]
    fn test_push_args_remote_and_branch() {
        let config = CheckpointConfig {
            remote: Some("origin".into()),
            branch: Some("main".into()),
            ..Default::default()
        };
        let checkpointer = GitCheckpointer::new(&config, vec![]);
        assert_eq!(checkpointer.push_args(), vec!["push", "origin", "main"]);
    }

    #[test]
    fn test_branch_ignored_without_remote() {
        let config = CheckpointConfig {
            branch: Some("main".into()),
            ..Default::default()
        };
        let checkpointer = GitCheckpointer::new(&config, vec![]);
        assert_eq!(checkpointer.push_args(), vec!["push"]);
    }

    #[test]
    fn test_commit_message_mentions_count() {
        let message = GitCheckpointer::commit_message(50);
        assert!(message.starts_with("Auto-commit: 50 credit union websites scraped ("));
        assert!(message.ends_with("Z)"));
    }

    #[tokio::test]
    async fn test_no_files_means_nothing_to_commit() {
        let dir = TempDir::new().unwrap();
        let checkpointer = GitCheckpointer::new(
            &CheckpointConfig::default(),
            vec![dir.path().join("missing.csv")],
        );

        let outcome = checkpointer.checkpoint(3).await.unwrap();
        assert_eq!(outcome, CheckpointOutcome::NothingToCommit);
    }

    #[tokio::test]
    async fn test_commits_then_skips_unchanged_files() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        let csv = dir.path().join("websites.csv");
        fs::write(&csv, "charter_number,website,scraped_timestamp\n").unwrap();

        // relative path, resolved against repo_dir
        let checkpointer =
            GitCheckpointer::new(&repo_config(dir.path()), vec![PathBuf::from("websites.csv")]);

        // no remote configured, so the commit stays local
        match checkpointer.checkpoint(1).await.unwrap() {
            CheckpointOutcome::PublishFailed { attempts, .. } => assert_eq!(attempts, 2),
            other => panic!("expected push failure, got {:?}", other),
        }
        assert_eq!(commit_count(dir.path()), 1);
        let log = run_git(dir.path(), &["log", "--format=%s"]);
        assert!(log.starts_with("Auto-commit: 1 credit union websites scraped ("));

        let outcome = checkpointer.checkpoint(0).await.unwrap();
        assert_eq!(outcome, CheckpointOutcome::NothingToCommit);
        assert_eq!(commit_count(dir.path()), 1);

        fs::write(
            &csv,
            "charter_number,website,scraped_timestamp\n1,a.org,2025-01-01T00:00:00Z\n",
        )
        .unwrap();
        checkpointer.checkpoint(1).await.unwrap();
        assert_eq!(commit_count(dir.path()), 2);
    }

    #[tokio::test]
    async fn test_pushes_to_remote() {
        if !git_available() {
            return;
        }
        let root = TempDir::new().unwrap();
        let remote = root.path().join("remote.git");
        let work = root.path().join("work");
        fs::create_dir(&work).unwrap();
        run_git(root.path(), &["init", "--quiet", "--bare", "remote.git"]);
        init_repo(&work);
        run_git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);
        fs::write(work.join("errors.log"), "2025-01-01T00:00:00Z,charter_4,boom\n").unwrap();

        let config = CheckpointConfig {
            remote: Some("origin".into()),
            branch: Some("HEAD".into()),
            ..repo_config(&work)
        };
        let checkpointer = GitCheckpointer::new(&config, vec![work.join("errors.log")]);

        let outcome = checkpointer.checkpoint(1).await.unwrap();
        assert_eq!(outcome, CheckpointOutcome::Published { attempts: 1 });
        assert_eq!(commit_count(&remote), 1);
    }
}
