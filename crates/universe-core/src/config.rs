//! API endpoint configuration.
//!
//! The base URL is injected at startup instead of being read from ambient
//! globals. [`ApiConfig::from_env`] reads `UNIVERSE_API_URL` and
//! `UNIVERSE_API_TIMEOUT_MS`; callers may override either afterwards.

use std::env;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

pub const ENV_API_URL: &str = "UNIVERSE_API_URL";
pub const ENV_API_TIMEOUT_MS: &str = "UNIVERSE_API_TIMEOUT_MS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api base url '{value}' is not a valid http(s) url")]
    InvalidBaseUrl { value: String },
    #[error("{name} must be a positive integer: '{value}'")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Origin and request timeout for the universe API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    pub timeout_ms: u64,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(ENV_API_URL)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Ok(raw) = env::var(ENV_API_TIMEOUT_MS) {
            if !raw.trim().is_empty() {
                config.timeout_ms = parse_timeout(ENV_API_TIMEOUT_MS, &raw)?;
            }
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the base URL. `path` must start with `/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = || ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
    };

    let parsed = reqwest::Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }

    Ok(trimmed.to_string())
}

fn parse_timeout(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidTimeout {
            name,
            value: raw.to_string(),
        }),
    }
}
