//! On-disk miner settings
//!
//! Persists `MinerConfig` as JSON. Missing files fall back to protocol
//! defaults; every field can still be overridden from the command line.

use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::algorithm::MinerConfig;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] crate::algorithm::Error),
}

/// Load settings from `path`, or defaults if the file does not exist
pub fn load_or_default(path: &Path) -> Result<MinerConfig, SettingsError> {
    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(MinerConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: MinerConfig = serde_json::from_str(&content)?;
    config.validate()?;
    debug!(path = %path.display(), "settings loaded");
    Ok(config)
}

/// Write settings to `path`, creating parent directories
pub fn save(config: &MinerConfig, path: &Path) -> Result<(), SettingsError> {
    config.validate()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}

/// Get the default settings file path
#[cfg(feature = "cli")]
pub fn default_settings_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".tetrapow").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{Partition, HARDENING_ITERATIONS};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, MinerConfig::default());
        assert_eq!(config.hardening_iterations, HARDENING_ITERATIONS);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = MinerConfig {
            hardening_iterations: 1_000,
            workers: 6,
            partition: Partition::Range,
            deadline_ms: Some(30_000),
        };

        save(&config, &path).unwrap();
        assert_eq!(load_or_default(&path).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_or_default(&path),
            Err(SettingsError::InvalidFormat(_))
        ));

        fs::write(&path, r#"{"workers": 0}"#).unwrap();
        assert!(matches!(
            load_or_default(&path),
            Err(SettingsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_save_refuses_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = MinerConfig {
            hardening_iterations: 0,
            ..MinerConfig::default()
        };
        assert!(save(&config, &dir.path().join("config.json")).is_err());
    }
}
