use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const API_URL_ENV: &str = "JOBTRACK_API_URL";
const LOG_ENV: &str = "JOBTRACK_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub api_url: String,
    pub log_level: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Defaults, then the config file, then environment, then the `--api-url` flag.
    pub fn load(api_url_flag: Option<&str>) -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        if let Some(url) = api_url_flag {
            config.api_url = url.to_string();
        }
        config.api_url = config.api_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Missing file means defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(level) = lookup(LOG_ENV).filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "jobtrack")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn log_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "jobtrack")
            .map(|dirs| dirs.data_dir().join("jobtrack.log"))
            .unwrap_or_else(|| PathBuf::from("jobtrack.log"))
    }
}
