//! Configuration Module
//! Settings loaded from an optional JSON file, overridable from the command line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "aircrash-dashboard.json";

/// Dataset opened at startup when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "Air Crash Full Data Updated_2024.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV dataset loaded at startup
    pub data_path: PathBuf,
    /// Filtered rows shown in the preview grid
    pub preview_rows: usize,
    /// Where chart images and summaries are written
    pub export_dir: PathBuf,
    /// Default tracing filter; `RUST_LOG` takes precedence
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            preview_rows: 5,
            export_dir: PathBuf::from("."),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load settings. An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(ConfigError::NotFound(path));
            }
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview_rows == 0 {
            return Err(ConfigError::Invalid(
                "preview_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_FILE));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"preview_rows": 20, "data_path": "crashes.csv"}}"#).unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.preview_rows, 20);
        assert_eq!(config.data_path, PathBuf::from("crashes.csv"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/no/such/config.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"preview_rows": 0}}"#).unwrap();
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "not json").unwrap();
        let err = AppConfig::load(Some(broken.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
