pub mod config;
pub mod http_fetcher;
pub mod response;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{CharterNumber, Website};

pub use config::ApiConfig;
pub use http_fetcher::HttpFetcher;

/// Resolves the website on file for a single charter.
///
/// `Ok(Website::Unknown)` means the API answered but has no website; an
/// `Err` means the lookup itself failed and may be retried on a later run.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, charter: CharterNumber) -> Result<Website>;
}
