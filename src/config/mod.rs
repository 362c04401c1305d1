//! config
//!
//! Persisted target state: which API the CLI talks to and which
//! organization/space commands operate in by default.
//!
//! # Overview
//!
//! The target file is the only cross-invocation state the CLI keeps
//! besides secrets. Commands read it at startup to build the "given"
//! context for input resolution (current organization, current space) and
//! write it back when the operator retargets.
//!
//! # Durability
//!
//! Saves are atomic (write to a temp file, then rename) and guarded by an
//! OS-level exclusive lock so two concurrent invocations cannot interleave
//! partial writes.

pub mod schema;

pub use schema::{normalize_target_url, TargetConfig};

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Environment variable overriding the state directory (used by tests).
pub const HOME_ENV: &str = "STRATUS_HOME";

/// File name of the target state inside the state directory.
const TARGET_FILE: &str = "target.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("another stratus process is updating the target")]
    Locked,

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loads and saves the target file in a state directory.
#[derive(Debug, Clone)]
pub struct TargetStore {
    dir: PathBuf,
}

impl TargetStore {
    /// Store at the default location: `$STRATUS_HOME` or `~/.stratus`.
    pub fn open_default() -> Result<Self, ConfigError> {
        if let Ok(dir) = std::env::var(HOME_ENV) {
            return Ok(Self { dir: dir.into() });
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self {
            dir: home.join(".stratus"),
        })
    }

    /// Store at a custom directory. Primarily useful for testing.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The state directory this store uses.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target_path(&self) -> PathBuf {
        self.dir.join(TARGET_FILE)
    }

    /// Load the target state. A missing file is an empty target, not an
    /// error.
    pub fn load(&self) -> Result<TargetConfig, ConfigError> {
        let path = self.target_path();
        if !path.exists() {
            return Ok(TargetConfig::default());
        }
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Save the target state atomically under an exclusive lock.
    pub fn save(&self, config: &TargetConfig) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.dir).map_err(|source| ConfigError::WriteError {
            path: self.dir.clone(),
            source,
        })?;

        let lock_path = self.dir.join(".target.lock");
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| ConfigError::WriteError {
                path: lock_path.clone(),
                source,
            })?;
        lock.try_lock_exclusive().map_err(|_| ConfigError::Locked)?;

        let path = self.target_path();
        let rendered = toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let tmp_path = self.dir.join(".target.toml.tmp");
        let result = (|| {
            let mut tmp = fs::File::create(&tmp_path).map_err(|source| ConfigError::WriteError {
                path: tmp_path.clone(),
                source,
            })?;
            tmp.write_all(rendered.as_bytes())
                .map_err(|source| ConfigError::WriteError {
                    path: tmp_path.clone(),
                    source,
                })?;
            fs::rename(&tmp_path, &path).map_err(|source| ConfigError::WriteError {
                path: path.clone(),
                source,
            })
        })();

        let _ = fs2::FileExt::unlock(&lock);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_empty_target() {
        let dir = TempDir::new().unwrap();
        let store = TargetStore::at(dir.path());
        assert_eq!(store.load().unwrap(), TargetConfig::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = TargetStore::at(dir.path());

        let config = TargetConfig {
            api: Some("https://api.stratus.example.com".into()),
            organization: Some("acme".into()),
            space: None,
        };
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);

        // No temp file left behind.
        assert!(!dir.path().join(".target.toml.tmp").exists());
    }

    #[test]
    fn save_overwrites_previous_state() {
        let dir = TempDir::new().unwrap();
        let store = TargetStore::at(dir.path());

        let mut config = TargetConfig {
            api: Some("https://one.example.com".into()),
            ..Default::default()
        };
        store.save(&config).unwrap();

        config.api = Some("https://two.example.com".into());
        config.organization = Some("acme".into());
        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(TARGET_FILE), "not valid toml [").unwrap();
        let store = TargetStore::at(dir.path());
        assert!(matches!(
            store.load().unwrap_err(),
            ConfigError::ParseError { .. }
        ));
    }
}
