//! Persisted application settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use simscope_core::DEFAULT_SERVICE_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base origin of the comparison service.
    pub service_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load the config file, falling back to defaults on a missing or
    /// unreadable file.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "invalid config file; using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                // A missing file is the normal first run; anything else is
                // worth a trace.
                if err.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), %err, "could not read config file; using defaults");
                }
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = config_path().context("no config directory available")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(&path, text).with_context(|| format!("could not write {}", path.display()))?;
        Ok(())
    }
}

/// Trim whitespace and trailing slashes from a user-entered endpoint.
/// Returns `None` when nothing usable remains.
pub fn normalize_endpoint(input: &str) -> Option<String> {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn config_path() -> Option<PathBuf> {
    let dirs = directories_next::ProjectDirs::from("", "", "SimScope")?;
    Some(dirs.config_dir().join("config.toml"))
}
