//! Configuration Module
//!
//! Client settings resolved from the environment.

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Backend address used when `EMS_API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
/// Request timeout used when `EMS_TIMEOUT_SECS` is not set
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "EMS_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "EMS_TIMEOUT_SECS";
pub const ENV_DATA_DIR: &str = "EMS_DATA_DIR";

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub timeout: Duration,
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Build a configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = parse_api_url(&raw_url)?;

        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                if secs == 0 {
                    return Err(ConfigError::InvalidTimeout(raw));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let data_dir = lookup(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Ok(Self {
            api_base_url,
            timeout,
            data_dir,
        })
    }

    /// Directory for rolling log files
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Parse and validate a backend base URL
pub fn parse_api_url(input: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(input.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("{input}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl(format!(
            "{input}: unsupported scheme '{other}'"
        ))),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("EMS")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid timeout (expected positive seconds): {0}")]
    InvalidTimeout(String),
}
