//! Configuration handling for the TUI

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const STORE_URL_ENV: &str = "CARD_FORM_STORE_URL";
pub const STORE_API_KEY_ENV: &str = "CARD_FORM_STORE_API_KEY";
pub const TABLE_ENV: &str = "CARD_FORM_TABLE";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Platform directories for config, session and data files
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "card-form", "card-form-tui")
}

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Base URL of the hosted database (REST API lives under `/rest/v1`)
    pub store_url: Option<String>,
    /// Public api key sent with every request
    pub store_api_key: Option<String>,
    /// Table payment records go to
    pub payment_table: Option<String>,
    /// Local store file used when no hosted database is configured
    pub local_store_path: Option<PathBuf>,
    /// Seconds before a hosted insert is abandoned
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Read a config file. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Replace values with non-empty entries from `lookup`
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(STORE_URL_ENV) {
            self.store_url = Some(url);
        }
        if let Some(key) = get(STORE_API_KEY_ENV) {
            self.store_api_key = Some(key);
        }
        if let Some(table) = get(TABLE_ENV) {
            self.payment_table = Some(table);
        }
        self
    }

    /// Hosted store settings, when both URL and key are present
    pub fn remote_store(&self) -> Option<(&str, &str)> {
        match (self.store_url.as_deref(), self.store_api_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Some((url, key)),
            _ => None,
        }
    }

    /// How long a hosted insert may take
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Path of the local store file
    pub fn local_store_path(&self) -> PathBuf {
        self.local_store_path.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(std::env::temp_dir)
                .join("payment_details.jsonl")
        })
    }
}
