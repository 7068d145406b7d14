//! Poller configuration.

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/todos";
pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("endpoint URL must not be empty")]
    EmptyEndpoint,
    #[error("item limit must be at least 1")]
    ZeroLimit,
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}

/// Settings for fetching and polling the todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Endpoint queried with `GET {endpoint}?_limit={limit}`
    pub endpoint: String,
    /// Number of items requested per poll
    pub limit: usize,
    /// Delay between timer-driven polls
    pub interval: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            limit: DEFAULT_LIMIT,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PollerConfig {
    /// Check the fields a single fetch uses.
    pub fn validate_request(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        Ok(())
    }

    /// Check everything, including the polling interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_request()?;
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}
