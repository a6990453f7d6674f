//! Configuration management for the SQL runner.
//!
//! Handles the optional TOML config file with named warehouse profiles,
//! and normalization of Databricks workspace hostnames. Access tokens are
//! never read from config files; they come from the CLI or environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, RunnerError};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Named warehouse profiles.
    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,
}

/// A named warehouse profile from the config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileConfig {
    /// Databricks workspace hostname.
    pub server_hostname: Option<String>,

    /// SQL warehouse id.
    pub warehouse_id: Option<String>,
}

impl Config {
    /// Returns the default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("dbx-sql-runner").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default (empty) configuration; an
    /// unreadable or invalid file is a configuration error.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            RunnerError::config(format!("Could not read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&contents).map_err(|e| {
            RunnerError::config(format!("Invalid config file {}: {e}", path.display()))
        })
    }

    /// Looks up a named profile.
    pub fn get_profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.get(name)
    }
}

/// Fully resolved warehouse connection parameters.
///
/// Built once from CLI arguments, environment, and config file, then passed
/// explicitly into client construction; nothing downstream reads ambient
/// state.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Normalized workspace hostname (no scheme, no path).
    pub server_hostname: String,

    /// SQL warehouse id.
    pub warehouse_id: String,

    /// Access token for bearer authentication.
    pub access_token: String,
}

impl WarehouseConfig {
    /// Returns a loggable description that omits the token.
    pub fn display_string(&self) -> String {
        format!("{} (warehouse {})", self.server_hostname, self.warehouse_id)
    }
}

/// Normalizes a Databricks workspace hostname.
///
/// Accepts a bare hostname or a full URL; a URL is reduced to its host.
/// Anything after the first `.net` is dropped, matching how workspace
/// hostnames are pasted out of browser address bars.
pub fn normalize_hostname(raw: &str) -> String {
    let mut hostname = raw.trim().to_string();

    if hostname.contains("://") {
        if let Ok(parsed) = Url::parse(&hostname) {
            if let Some(host) = parsed.host_str() {
                hostname = host.to_string();
            }
        }
    }

    if let Some(index) = hostname.find(".net") {
        hostname.truncate(index + ".net".len());
    }

    hostname
}
