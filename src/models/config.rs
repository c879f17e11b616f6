//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and fetch behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Upstream NOTAM source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.source.apply_env();
        Ok(config)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.max_concurrent == 0 {
            return Err(AppError::validation("fetch.max_concurrent must be > 0"));
        }
        match self.source.kind {
            SourceKind::Faa => {
                if self.source.base_url.trim().is_empty() {
                    return Err(AppError::validation("source.base_url is empty"));
                }
                if self.source.page_size == 0 {
                    return Err(AppError::validation("source.page_size must be > 0"));
                }
            }
            SourceKind::Directory => {
                if self.source.data_dir.as_os_str().is_empty() {
                    return Err(AppError::validation("source.data_dir is empty"));
                }
            }
        }
        Ok(())
    }
}

/// HTTP client and fetch behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay after each completed location fetch in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum locations fetched concurrently
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Which upstream provides notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// FAA NOTAM API over HTTP
    #[default]
    Faa,
    /// Directory of `{LOCATION}.json` files
    Directory,
}

/// Upstream NOTAM source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// Base URL of the NOTAM API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Items requested per page
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    /// Directory holding per-location JSON files
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,

    /// Value for the `client_id` request header
    #[serde(default, skip_serializing)]
    pub client_id: Option<String>,

    /// Value for the `client_secret` request header
    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,
}

impl SourceConfig {
    /// Override API header values from `FAA_ID` / `FAA_SECRET` when set.
    pub fn apply_env(&mut self) {
        if let Ok(id) = std::env::var("FAA_ID") {
            self.client_id = Some(id);
        }
        if let Ok(secret) = std::env::var("FAA_SECRET") {
            self.client_secret = Some(secret);
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            base_url: defaults::base_url(),
            page_size: defaults::page_size(),
            data_dir: defaults::data_dir(),
            client_id: None,
            client_secret: None,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; notam-search/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Source defaults
    pub fn base_url() -> String {
        "https://external-api.faa.gov/notamapi/v1".into()
    }
    pub fn page_size() -> usize {
        1000
    }
    pub fn data_dir() -> PathBuf {
        PathBuf::from("data/notams")
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
