//! Configuration paths and file loading.
//!
//! Retry settings live in the XDG config directory by default
//! (`~/.config/netcheck/retry.json`). Files may be JSON or YAML, picked by
//! extension.

use super::retry::RetryConfig;
use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Global paths singleton.
static PATHS: OnceLock<Option<Paths>> = OnceLock::new();

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/netcheck)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Get the global paths instance.
    pub fn get() -> ConfigResult<&'static Paths> {
        PATHS
            .get_or_init(Self::new)
            .as_ref()
            .ok_or(ConfigError::DirectoryNotFound)
    }

    fn new() -> Option<Self> {
        let project = ProjectDirs::from("com", "netcheck", "netcheck")?;
        Some(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the retry settings file.
    pub fn retry_file(&self) -> PathBuf {
        self.config_dir.join("retry.json")
    }
}

impl RetryConfig {
    /// Load settings from the default location, falling back to defaults
    /// when no file exists.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::get()?.retry_file();
        if !file.exists() {
            debug!(path = %file.display(), "no retry configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from a specific JSON or YAML file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "loading retry configuration");

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| ConfigError::InvalidFormat(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| ConfigError::InvalidFormat(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
