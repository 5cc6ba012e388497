//! Environment-driven configuration for the polling service.

use std::time::Duration;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Runtime configuration, read from the environment with defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream API (`ARENA_API_URL`).
    pub base_url: Url,
    /// Incremental poll cadence (`ARENA_POLL_INTERVAL_SECS`, default 5).
    pub poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let base_url = std::env::var("ARENA_API_URL")
            .ok()
            .and_then(|raw| Url::parse(&raw).ok())
            .unwrap_or_else(|| Url::parse(DEFAULT_API_URL).unwrap());

        let poll_interval_secs = std::env::var("ARENA_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        Self {
            base_url,
            poll_interval: Duration::from_secs(poll_interval_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).unwrap(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}
