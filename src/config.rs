//! Client configuration.
//!
//! Resolved in three layers, later ones winning:
//! 1. built-in defaults,
//! 2. `config.json` in the user's config directory (`<config_dir>/taskify/`),
//! 3. environment variables:
//!    - `TASKIFY_API_URL` - backend base URL
//!    - `TASKIFY_SESSION_FILE` - where the credential pair is stored
//!    - `TASKIFY_STALE_EDIT` - `clear` or `preserve`, see [`StaleEditPolicy`]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::client::{TaskifyClient, DEFAULT_URL};
use crate::collection::StaleEditPolicy;

const APP_NAME: &str = "taskify";
const CONFIG_FILE: &str = "config.json";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend, without the `/api` prefix.
    pub api_url: String,
    /// Session file location. Defaults to `<config_dir>/taskify/session.json`.
    pub session_file: Option<PathBuf>,
    /// Edit cursor behaviour when a record at or before it is removed.
    /// Passed to every review page the CLI builds. `--edit` ops hold no
    /// cursor, so it only matters to callers driving `begin_edit`.
    pub stale_edit: StaleEditPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_URL.to_string(),
            session_file: None,
            stale_edit: StaleEditPolicy::default(),
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    /// Falls back to defaults if the file fails to parse.
    pub fn load() -> Self {
        let config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    fn try_load() -> Result<Self> {
        let config_path = config_path(CONFIG_FILE)?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(&config_path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Apply overrides looked up by environment variable name.
    /// Invalid values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("TASKIFY_API_URL").filter(|u| !u.is_empty()) {
            self.api_url = url;
        }
        if let Some(path) = lookup("TASKIFY_SESSION_FILE").filter(|p| !p.is_empty()) {
            self.session_file = Some(PathBuf::from(path));
        }
        if let Some(policy) = lookup("TASKIFY_STALE_EDIT") {
            match policy.parse() {
                Ok(policy) => self.stale_edit = policy,
                Err(e) => tracing::warn!("Ignoring TASKIFY_STALE_EDIT: {}", e),
            }
        }
        self
    }

    /// Where the credential pair is stored.
    pub fn session_path(&self) -> Result<PathBuf> {
        match self.session_file {
            Some(ref path) => Ok(path.clone()),
            None => config_path(SESSION_FILE),
        }
    }

    /// A client for the configured backend, without credentials.
    pub fn client(&self) -> TaskifyClient {
        TaskifyClient::new(&self.api_url)
    }
}

fn config_path(file: &str) -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(file);
    Ok(path)
}
