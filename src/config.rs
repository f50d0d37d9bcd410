//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{FeedError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Client id sent to the upstream photo API
    pub client_id: String,
    /// Base URL of the upstream photo API
    pub base_url: String,
    /// Account whose recent media is shown on the feed page
    pub username: String,
    /// Number of recent media items requested per fetch
    pub media_count: usize,
    /// Default TTL in seconds for cached upstream responses
    pub default_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Grid columns per row
    pub items_per_row: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Root directory holding `css/` and `js/` assets
    pub static_dir: String,
    /// Upstream request timeout in seconds
    pub request_timeout: u64,
}

/// Upper bound in seconds for every configured duration (ten years).
pub const MAX_DURATION_SECS: u64 = 10 * 365 * 24 * 60 * 60;

fn lookup_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CLIENT_ID` - Upstream API client id (default: empty)
    /// - `BASE_URL` - Upstream API base URL (default: https://api.instagram.com/v1)
    /// - `FEED_USERNAME` - Account to display (default: mimozaflowers)
    /// - `MEDIA_COUNT` - Media items per fetch (default: 20)
    /// - `DEFAULT_TTL` - Cache TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `ITEMS_PER_ROW` - Grid columns (default: 4)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STATIC_DIR` - Static asset root (default: public)
    /// - `REQUEST_TIMEOUT` - Upstream timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup, falling back to the
    /// default for missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            client_id: lookup("CLIENT_ID").unwrap_or(defaults.client_id),
            base_url: lookup("BASE_URL").unwrap_or(defaults.base_url),
            username: lookup("FEED_USERNAME").unwrap_or(defaults.username),
            media_count: lookup_or(&lookup, "MEDIA_COUNT", defaults.media_count),
            default_ttl: lookup_or(&lookup, "DEFAULT_TTL", defaults.default_ttl),
            sweep_interval: lookup_or(&lookup, "SWEEP_INTERVAL", defaults.sweep_interval),
            items_per_row: lookup_or(&lookup, "ITEMS_PER_ROW", defaults.items_per_row),
            server_port: lookup_or(&lookup, "SERVER_PORT", defaults.server_port),
            static_dir: lookup("STATIC_DIR").unwrap_or(defaults.static_dir),
            request_timeout: lookup_or(&lookup, "REQUEST_TIMEOUT", defaults.request_timeout),
        }
    }

    /// Rejects values the cache and grid cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.items_per_row == 0 {
            return Err(FeedError::Config("ITEMS_PER_ROW must be at least 1".into()));
        }
        if self.default_ttl == 0 {
            return Err(FeedError::Config("DEFAULT_TTL must be at least 1 second".into()));
        }
        if self.sweep_interval == 0 {
            return Err(FeedError::Config(
                "SWEEP_INTERVAL must be at least 1 second".into(),
            ));
        }
        for (name, secs) in [
            ("DEFAULT_TTL", self.default_ttl),
            ("SWEEP_INTERVAL", self.sweep_interval),
            ("REQUEST_TIMEOUT", self.request_timeout),
        ] {
            if secs > MAX_DURATION_SECS {
                return Err(FeedError::Config(format!(
                    "{name} must be at most {MAX_DURATION_SECS} seconds"
                )));
            }
        }
        if self.base_url.is_empty() {
            return Err(FeedError::Config("BASE_URL cannot be empty".into()));
        }
        Ok(())
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            base_url: "https://api.instagram.com/v1".to_string(),
            username: "mimozaflowers".to_string(),
            media_count: 20,
            default_ttl: 300,
            sweep_interval: 60,
            items_per_row: 4,
            server_port: 3000,
            static_dir: "public".to_string(),
            request_timeout: 10,
        }
    }
}
