//! Configuration management for cuweb.
//!
//! Configuration is read from `~/.config/cuweb/config.toml` at startup, or
//! from the file passed with `--config`. If the default file doesn't exist,
//! one with comments is created. Command-line flags override file values.

use crate::batch::BatchConfig;
use crate::checkpoint::CheckpointConfig;
use crate::fetcher::ApiConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub batch: BatchConfig,
    pub checkpoint: CheckpointConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// A missing explicit path is an error; a missing default path creates a
    /// default file with comments. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/cuweb/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("cuweb").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# cuweb configuration
#
# Relative paths are resolved against the directory cuweb is run from.

[api]
# Charter number is appended as the last path segment
base_url = "https://mapping.ncua.gov/api/CreditUnionDetails/GetCreditUnionDetails"

# Request timeout in seconds
timeout_secs = 30

[batch]
# One charter number per line
input = "charter_numbers.txt"

# Result CSV; charters already listed here are never fetched again
output = "credit_union_websites.csv"

error_log = "scrape_errors.log"
progress_file = ".scrape_progress"

# Seconds to wait between requests
rate_limit_secs = 1.0

# Commit and push after this many processed records
commit_interval = 50

[checkpoint]
# Commit the output files to the enclosing git repository
enabled = true

# Run git in this directory instead of the current one
# repo_dir = "/path/to/checkout"

# Push attempts, waiting initial_backoff_secs and doubling after each failure
max_attempts = 4
initial_backoff_secs = 2

# Push target; leave unset to use the current branch's upstream
# remote = "origin"
# branch = "main"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
