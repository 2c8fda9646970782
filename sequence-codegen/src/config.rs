use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
};

use crate::firmware::FirmwareDir;

pub const BASE_DIR_VAR: &str = "WRITE_BASE_DIR";
pub const HEADER_VAR: &str = "STAMPFLY_HEADER";

pub const DEFAULT_BASE_DIR: &str = "firmware";
pub const DEFAULT_HEADER: &str = "M5Stampfly/src/direction_sequence.hpp";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error("Failed to read env file {0}: {1}")]
    EnvFile(PathBuf, String),
}

/// Where the firmware lives and which header holds the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_dir: PathBuf,
    /// Relative to `base_dir`.
    pub header: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            header: PathBuf::from(DEFAULT_HEADER),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables,
    /// then `.env`, falling back to the defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        let file = if cfg!(test) {
            None
        } else {
            dotenvy::dotenv_iter().ok()
        };
        Self::from_sources(file, Path::new(".env"))
    }

    /// Like [Config::from_env], but reads the given env file instead of `.env`.
    /// Unlike `.env`, the file must exist.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = dotenvy::from_path_iter(path)
            .map_err(|e| ConfigError::EnvFile(path.to_path_buf(), e.to_string()))?;
        Self::from_sources(Some(file), path)
    }

    /// Process environment wins over the file, as with `dotenvy::dotenv`.
    fn from_sources(
        file: Option<dotenvy::Iter<File>>,
        file_path: &Path,
    ) -> Result<Self, ConfigError> {
        let mut from_file = HashMap::new();
        for item in file.into_iter().flatten() {
            let (key, value) = item
                .map_err(|e| ConfigError::EnvFile(file_path.to_path_buf(), e.to_string()))?;
            from_file.insert(key, value);
        }
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| from_file.get(key).cloned())
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let non_empty = |key: &str| match lookup(key) {
            Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidValue(
                key.to_string(),
                "value is empty".to_string(),
            )),
            other => Ok(other.map(PathBuf::from)),
        };

        Ok(Self {
            base_dir: non_empty(BASE_DIR_VAR)?.unwrap_or(defaults.base_dir),
            header: non_empty(HEADER_VAR)?.unwrap_or(defaults.header),
        })
    }

    pub fn firmware_dir(&self) -> FirmwareDir {
        FirmwareDir::new(&self.base_dir)
    }
}
