//! User settings for an application built on reticular
//!
//! Settings live in `config.toml` under the platform config directory of the
//! application (`~/.config/<app>/config.toml` on Linux). Setting
//! `<APP>_CONFIG` to a path reads that file instead.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::DEFAULT_PROMPT;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prompt shown in interactive mode
    pub prompt: String,

    /// Replaces the welcome message of interactive mode
    pub message: Option<String>,

    /// Log filter directive used when no environment filter is set
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            message: None,
            log_level: None,
        }
    }
}

impl Settings {
    /// Loads the settings of `app`, falling back to defaults when no file exists
    pub fn load(app: &str) -> Result<Self> {
        let path = match Self::path(app) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        Self::from_path(&path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))
    }

    /// Settings file for `app`, honouring the `<APP>_CONFIG` override
    pub fn path(app: &str) -> Option<PathBuf> {
        if let Some(path) = env::var_os(override_var(app)) {
            return Some(PathBuf::from(path));
        }
        config_dir(app).map(|dir| dir.join("config.toml"))
    }

    /// Reads a settings file; a missing file yields the defaults
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        toml::from_str(content).map_err(|e| SettingsError::Parse(e.to_string()))
    }
}

/// Platform config directory of `app`
pub fn config_dir(app: &str) -> Option<PathBuf> {
    ProjectDirs::from("", "", app).map(|dirs| dirs.config_dir().to_path_buf())
}

fn override_var(app: &str) -> String {
    let name: String = app
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("{}_CONFIG", name)
}
