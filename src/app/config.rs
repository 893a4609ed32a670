use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.paymentgateway.com";
pub const DEFAULT_PROBE_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub candidate_urls: Vec<String>,
    pub probe_delay_ms: u64,
    pub request_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            candidate_urls: Vec::new(),
            probe_delay_ms: DEFAULT_PROBE_DELAY_MS,
            request_timeout_ms: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Environment variables take precedence over whatever is already set.
    pub fn with_env_overrides(self) -> Self {
        Self {
            api_key: env::var("PAYMENT_API_KEY").unwrap_or(self.api_key),
            base_url: env::var("PAYMENT_BASE_URL").unwrap_or(self.base_url),
            candidate_urls: env::var("PAYMENT_CANDIDATE_URLS")
                .map(|raw| split_urls(&raw))
                .unwrap_or(self.candidate_urls),
            probe_delay_ms: env::var("PROBE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.probe_delay_ms),
            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(self.request_timeout_ms),
        }
    }

    pub fn probe_delay(&self) -> Duration {
        Duration::from_millis(self.probe_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn split_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
