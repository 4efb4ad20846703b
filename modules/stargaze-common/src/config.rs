use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // NASA
    pub nasa_api_key: String,
    pub nasa_base_url: String,

    // ISS position API
    pub iss_base_url: String,

    pub http_timeout: Duration,

    // Catalog
    pub refresh_interval: Duration,
    pub page_size: usize,

    /// JSON file replacing the built-in agency feed.
    pub agency_feed_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if a numeric var does not parse.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            nasa_api_key: or_default("NASA_API_KEY", "DEMO_KEY"),
            nasa_base_url: or_default("NASA_BASE_URL", "https://api.nasa.gov"),
            iss_base_url: or_default("ISS_BASE_URL", "https://api.wheretheiss.at"),
            http_timeout: Duration::from_secs(number(&lookup, "HTTP_TIMEOUT_SECS", 30)),
            refresh_interval: Duration::from_secs(number(&lookup, "REFRESH_INTERVAL_SECS", 3600)),
            page_size: number(&lookup, "PAGE_SIZE", 6),
            agency_feed_path: lookup("STARGAZE_AGENCY_FEED")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Log the effective configuration with secrets masked.
    pub fn log_redacted(&self) {
        info!(
            nasa_api_key = %redact(&self.nasa_api_key),
            nasa_base_url = %self.nasa_base_url,
            iss_base_url = %self.iss_base_url,
            http_timeout_secs = self.http_timeout.as_secs(),
            refresh_interval_secs = self.refresh_interval.as_secs(),
            page_size = self.page_size,
            agency_feed = ?self.agency_feed_path,
            "Loaded config"
        );
    }
}

fn number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        None => default,
    }
}

fn redact(secret: &str) -> String {
    if secret == "DEMO_KEY" {
        return secret.to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}…")
}
