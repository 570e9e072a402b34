//! Runtime configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_STORE_URL: &str = "http://localhost:5005";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid store URL '{url}': {reason}")]
    InvalidStoreUrl { url: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Store base URL without a trailing slash.
    pub store_url: String,
    pub token: Option<String>,
    pub debounce: Duration,
    pub timeouts: StoreTimeouts,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SLIDEDECK_STORE_URL`: default `http://localhost:5005`
    /// - `SLIDEDECK_TOKEN`: bearer credential; requests fail as unauthenticated without it
    /// - `SLIDEDECK_DEBOUNCE_MS`: default 500
    /// - `SLIDEDECK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SLIDEDECK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the store URL does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store URL does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_url = normalize_store_url(
            lookup("SLIDEDECK_STORE_URL").as_deref().unwrap_or(DEFAULT_STORE_URL),
        )?;
        let token = lookup("SLIDEDECK_TOKEN").map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let debounce = Duration::from_millis(parse_or(&lookup, "SLIDEDECK_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS));
        let timeouts = StoreTimeouts {
            request_secs: parse_or(&lookup, "SLIDEDECK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(&lookup, "SLIDEDECK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { store_url, token, debounce, timeouts })
    }
}

/// Check that `raw` is an absolute http(s) URL and strip any trailing slash.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidStoreUrl`] for anything else.
pub fn normalize_store_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidStoreUrl { url: raw.to_string(), reason };
    let parsed = url::Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    Ok(trimmed.to_string())
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
