//! # cuweb
//!
//! Collects the website on file for federally insured credit unions from
//! the NCUA "credit union details" API, keyed by charter number.
//!
//! ## Architecture
//!
//! ```text
//! charter list → BatchRunner → Fetcher → CsvStore → Checkpointer (git)
//! ```
//!
//! - [`fetcher`]: one GET per charter, JSON decoding, website normalization
//! - [`store`]: append-only result CSV, error log and progress marker
//! - [`batch`]: resumable, rate-limited loop over the charter list
//! - [`checkpoint`]: periodic git commit + push with retry
//!
//! ## Quick Start
//!
//! ```bash
//! # Look up a single charter
//! cuweb fetch 5536
//!
//! # Work through a list, one request per second, committing every 50 records
//! cuweb batch --input charter_numbers.txt --rate-limit 1 --commit-interval 50
//!
//! # See what would be fetched
//! cuweb batch --dry-run
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration,
/// fetcher and checkpointer.
pub mod app;

/// The resumable batch driver.
///
/// - [`BatchRunner`](batch::BatchRunner): processes a charter list
/// - [`BatchConfig`](batch::BatchConfig): paths, rate limit, checkpoint interval
/// - [`BatchSummary`](batch::BatchSummary): counters reported at the end of a run
pub mod batch;

/// Periodic git snapshots of the output files.
pub mod checkpoint;

/// Command-line interface using clap.
///
/// - `fetch <charter>` - Print the website for one charter
/// - `batch` - Process a list of charters
pub mod cli;

/// Configuration loaded from `~/.config/cuweb/config.toml`.
pub mod config;

/// Core value types: charter numbers, websites, result rows, error entries.
pub mod domain;

/// NCUA API access.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for single-charter lookups
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Flat-file persistence.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`CsvStore`](store::CsvStore): CSV/log file implementation
pub mod store;
