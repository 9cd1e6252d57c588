//! Application configuration
//!
//! Loaded from a JSON file. Every field is optional; anything missing falls
//! back to its default.

use anyhow::{Context, Result};
use api_client::ApiClientConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::KvConfig;

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STORAGE_PATH: &str = "primatech_session.db";
const DEFAULT_LOG_FILTER: &str = "info";

/// Backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL the endpoint paths are appended to
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout_secs: DEFAULT_TIMEOUT_SECS }
    }
}

/// Device storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory of the session database
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { path: PathBuf::from(DEFAULT_STORAGE_PATH) }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend settings
    pub api: ApiSettings,
    /// Device storage settings
    pub storage: StorageSettings,
    /// `tracing` filter directives, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            storage: StorageSettings::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            Self::from_json(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// HTTP client configuration
    pub fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig::new(self.api.base_url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }

    /// Session database configuration
    pub fn kv_config(&self) -> KvConfig {
        KvConfig::new(self.storage.path.clone())
    }
}
