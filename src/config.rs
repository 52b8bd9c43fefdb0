// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest to highest: built-in defaults, the TOML config file,
//! `PORTAL_MENU_*` environment variables, command-line overrides.

use crate::backend::{FileBackend, HttpBackend, MenuBackend};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "PORTAL_MENU";

/// Keys accepted by `portal-menu config`
pub const KEYS: &[&str] = &["data_dir", "preview_language", "backend", "base_url", "log_level"];

/// Where menus are stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// JSON documents in the data directory
    #[default]
    File,
    /// Remote workspace menu service
    Http,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for menu documents and session state
    pub data_dir: PathBuf,
    /// Language used for tree labels
    pub preview_language: String,
    /// Backend kind
    #[serde(default)]
    pub backend: BackendKind,
    /// Base URL of the menu service (http backend)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: directories::ProjectDirs::from("org", "hyperpolymath", "portal-menu")
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".portal-menu")),
            preview_language: "en".to_string(),
            backend: BackendKind::File,
            base_url: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Open the configured backend
    pub fn open_backend(&self) -> Result<Box<dyn MenuBackend>> {
        match self.backend {
            BackendKind::File => Ok(Box::new(FileBackend::new(&self.data_dir))),
            BackendKind::Http => {
                let base_url = self
                    .base_url
                    .as_deref()
                    .context("base_url must be set when backend = \"http\"")?;
                Ok(Box::new(HttpBackend::new(base_url)?))
            }
        }
    }

    /// Look up a resolved value by key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        if !KEYS.contains(&key) {
            bail!("Unknown config key: {}. Known keys: {}", key, KEYS.join(", "));
        }
        let value = toml::Value::try_from(self).context("Failed to serialize config")?;
        Ok(value.get(key).map(|v| match v {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }
}

/// Default config file location
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "portal-menu")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from defaults, file and environment.
///
/// An explicit `path` must exist; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = Config::default();

    let mut builder = config::Config::builder()
        .set_default("data_dir", defaults.data_dir.to_string_lossy().into_owned())?
        .set_default("preview_language", defaults.preview_language)?
        .set_default("backend", "file")?
        .set_default("log_level", defaults.log_level)?;

    match path {
        Some(path) => {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None => {
            if let Some(path) = default_config_path() {
                builder = builder.add_source(config::File::from(path).required(false));
            }
        }
    }

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .context("Failed to read configuration")?;

    settings
        .try_deserialize()
        .context("Invalid configuration")
}

/// Write one key to a TOML config file, keeping the other entries
pub fn set(path: &Path, key: &str, value: &str) -> Result<()> {
    if !KEYS.contains(&key) {
        bail!("Unknown config key: {}. Known keys: {}", key, KEYS.join(", "));
    }
    if key == "backend" && !matches!(value, "file" | "http") {
        bail!("backend must be \"file\" or \"http\"");
    }

    let mut table = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        content
            .parse::<toml::Table>()
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        toml::Table::new()
    };

    table.insert(key.to_string(), toml::Value::String(value.to_string()));

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(&table).context("Failed to serialize config")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
