use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str =
    "https://mapping.ncua.gov/api/CreditUnionDetails/GetCreditUnionDetails";

/// Configuration for the NCUA details API client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint prefix; the charter number is appended as the last path segment
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// User agent string to send
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: concat!("cuweb/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("cuweb/"));
    }
}
