//! Configuration file handling
//!
//! One YAML file (`~/.apidock/config.yaml`, or `$APIDOCK_CONFIG`) holds both the
//! console and gateway sections. Every field has a default; unknown keys are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::constants::{CONFIG_ENV_VAR, DEFAULT_BIND_ADDR, DEFAULT_GATEWAY_URL, DEFAULT_USER_AGENT};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub console: ConsoleConfig,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Origin of the gateway; catalog paths are resolved against it
    pub gateway_url: String,
    pub user_agent: String,
    /// No timeout when absent
    pub request_timeout_secs: Option<u64>,
    /// Where media responses are written. Defaults to `<tmp>/apidock`.
    pub media_dir: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            gateway_url: String::from(DEFAULT_GATEWAY_URL),
            user_agent: String::from(DEFAULT_USER_AGENT),
            request_timeout_secs: None,
            media_dir: None,
        }
    }
}

impl ConsoleConfig {
    pub fn media_dir(&self) -> PathBuf {
        self.media_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("apidock"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub bind: String,
    /// Accepted API keys. Empty means every key is rejected.
    pub api_keys: Vec<String>,
    pub name: String,
    pub creator: String,
    pub description: String,
    pub link_whatsapp: Option<String>,
    pub link_youtube: Option<String>,
    pub upstream: UpstreamConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let settings = crate::models::Settings::default();
        GatewayConfig {
            bind: String::from(DEFAULT_BIND_ADDR),
            api_keys: Vec::new(),
            name: settings.name,
            creator: settings.creator,
            description: settings.description,
            link_whatsapp: None,
            link_youtube: None,
            upstream: UpstreamConfig::default(),
        }
    }
}

/// Third-party site scraped by the image generator
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub page_url: String,
    pub ajax_url: String,
    pub origin: String,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            page_url: String::from("https://flatai.org/ai-image-generator-free-no-signup/"),
            ajax_url: String::from("https://flatai.org/wp-admin/admin-ajax.php"),
            origin: String::from("https://flatai.org"),
            user_agent: String::from("Mozilla/5.0"),
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".apidock")
            .join("config.yaml")
    }

    /// Load from the default location
    pub fn load() -> Result<Config> {
        Self::load_from(&Self::default_path())
    }

    /// Load from a path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config.console.gateway_url, DEFAULT_GATEWAY_URL);
        assert_eq!(config.gateway.bind, DEFAULT_BIND_ADDR);
        assert!(config.gateway.api_keys.is_empty());
        assert!(config.console.request_timeout_secs.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "gateway:\n  api_keys: [alpha, beta]\n  upstream:\n    page_url: http://localhost:9/page\nunknown: 1\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.gateway.api_keys, ["alpha", "beta"]);
        assert_eq!(config.gateway.upstream.page_url, "http://localhost:9/page");
        assert_eq!(config.gateway.upstream.user_agent, "Mozilla/5.0");
        assert_eq!(config.console.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "gateway: [unclosed").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_media_dir_default() {
        let console = ConsoleConfig::default();
        assert!(console.media_dir().ends_with("apidock"));
    }
}
