//! CLI settings loaded from `~/.config/vimeo-dl/config.toml`.
//!
//! The library never reads this file on its own; callers turn it into a
//! [`ClientConfig`] with [`Settings::client_config`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_client::{ClientConfig, Endpoints};

/// Contents of the config file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Override the User-Agent header.
    pub user_agent: Option<String>,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds (unset: no limit).
    pub timeout_secs: Option<u64>,
    /// Default directory for downloads.
    pub download_dir: Option<PathBuf>,
    /// Endpoint template overrides.
    pub endpoints: Option<Endpoints>,
}

impl Settings {
    /// Load settings from `path`, or from the default location.
    ///
    /// A missing default file yields defaults. An explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => {
                let default = config_path();
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build the HTTP client settings, starting from the defaults.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(ref user_agent) = self.user_agent {
            config.user_agent.clone_from(user_agent);
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(ref endpoints) = self.endpoints {
            config.endpoints = endpoints.clone();
        }
        config
    }
}

/// Return the path to the default config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vimeo-dl")
        .join("config.toml")
}
