//! Configuration Module
//!
//! Handles loading client configuration from environment variables.

use std::env;
use std::time::Duration;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the restaurant API, without a trailing slash
    pub api_base_url: String,
    /// Bearer token for customer endpoints, if logged in
    pub api_token: Option<String>,
    /// Default cache TTL in milliseconds
    pub default_ttl_ms: u64,
    /// Interval in seconds between restaurant list refreshes
    pub restaurant_refresh_secs: u64,
    /// Interval in seconds between unread notification polls
    pub notification_poll_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - API base URL (default: http://localhost:5000/api)
    /// - `API_TOKEN` - Bearer token (default: none)
    /// - `DEFAULT_TTL_MS` - Default cache TTL in milliseconds (default: 30000)
    /// - `RESTAURANT_REFRESH_SECS` - Restaurant refresh interval (default: 60)
    /// - `NOTIFICATION_POLL_SECS` - Unread count poll interval (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_base_url),
            api_token: env::var("API_TOKEN").ok().filter(|token| !token.is_empty()),
            default_ttl_ms: parse_var("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            restaurant_refresh_secs: parse_var("RESTAURANT_REFRESH_SECS")
                .unwrap_or(defaults.restaurant_refresh_secs),
            notification_poll_secs: parse_var("NOTIFICATION_POLL_SECS")
                .unwrap_or(defaults.notification_poll_secs),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn restaurant_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.restaurant_refresh_secs)
    }

    pub fn notification_poll_interval(&self) -> Duration {
        Duration::from_secs(self.notification_poll_secs)
    }
}

fn parse_var(name: &str) -> Option<u64> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v| *v > 0)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            api_token: None,
            default_ttl_ms: 30_000,
            restaurant_refresh_secs: 60,
            notification_poll_secs: 30,
        }
    }
}
