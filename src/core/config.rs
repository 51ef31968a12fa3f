//! Application settings.
//!
//! Settings come from an optional JSON file and are then overridden by
//! command-line flags. Everything is validated before any batch starts.

use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::core::ConversionSettings;
use crate::processing::{BatchConfig, EncoderConfig};
use crate::utils::{ConverterError, ConverterResult, validate_concurrency, validate_settings};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub conversion: ConversionSettings,
    pub batch: BatchConfig,
    pub encoder: EncoderConfig,
}

impl AppConfig {
    /// Loads settings from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> ConverterResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConverterError::config(format!("Cannot read settings file {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            ConverterError::config(format!("Invalid settings file {}: {}", path.display(), e))
        })?;

        debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Rejects out-of-range tunables
    pub fn validate(&self) -> ConverterResult<()> {
        validate_settings(&self.conversion)?;
        validate_concurrency(self.batch.concurrency)?;
        self.batch.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"conversion": {"quality": 60}, "batch": {"concurrency": 2}, "encoder": {"timeoutSecs": 30}}"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.conversion.quality, 60);
        assert_eq!(config.conversion.speed, 6);
        assert_eq!(config.batch.concurrency, 2);
        assert_eq!(config.encoder.timeout_secs, 30);
        assert_eq!(config.encoder.node_path, std::path::PathBuf::from("node"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let mut config = AppConfig::default();
        config.batch.concurrency = 9;
        assert!(matches!(config.validate(), Err(ConverterError::Config(_))));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(AppConfig::load(Some(&path)), Err(ConverterError::Config(_))));
        assert!(matches!(
            AppConfig::load(Some(&dir.path().join("missing.json"))),
            Err(ConverterError::Config(_))
        ));
    }
}
