//! Configuration file handling

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::Result;
use crate::scenario::Templates;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// URL prefix every API path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Accept self-signed certificates (the local development server uses one)
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,

    /// Per-request timeout; the HTTP client default applies when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Scenario payload templates (`[auth]`, `[admin]`, `[menu]`, `[order]`)
    #[serde(flatten)]
    pub templates: Templates,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            accept_invalid_certs: default_accept_invalid_certs(),
            request_timeout_secs: None,
            templates: Templates::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://localhost:7226".to_string()
}

fn default_accept_invalid_certs() -> bool {
    true
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default config file is
    /// read if present, otherwise defaults are returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => match config_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        config.templates.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
