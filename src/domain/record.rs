use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::CharterNumber;

/// Written in place of a website when the API has none on file.
pub const UNKNOWN_WEBSITE: &str = "UNKNOWN";

/// Website resolved for a charter.
///
/// `Unknown` is a successful result: it is persisted like any other value
/// so the charter is not fetched again on the next run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Website {
    Known(String),
    Unknown,
}

impl Website {
    /// Normalize a raw API value. Missing or blank values become `Unknown`,
    /// everything else is trimmed and lowercased.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Website::Known(value.to_lowercase()),
            _ => Website::Unknown,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Website::Known(url) => url,
            Website::Unknown => UNKNOWN_WEBSITE,
        }
    }
}

impl fmt::Display for Website {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ResultRow {
    pub charter: CharterNumber,
    pub website: Website,
    pub scraped_at: DateTime<Utc>,
}

impl ResultRow {
    pub fn new(charter: CharterNumber, website: Website) -> Self {
        Self {
            charter,
            website,
            scraped_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub at: DateTime<Utc>,
    pub charter: CharterNumber,
    pub message: String,
}

impl ErrorEntry {
    pub fn new(charter: CharterNumber, message: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            charter,
            message: message.into(),
        }
    }
}
