// ⚙️ Engine Configuration - tunable analyzer parameters as data
//
// Every field has a default, so `{}` is a valid config file and a partial
// file only overrides what it names.

use crate::anomaly::DEFAULT_Z_THRESHOLD;
use crate::duplicates::{DEFAULT_TIME_WINDOW_HOURS, DEFAULT_TOLERANCE};
use crate::error::EngineError;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateSettings {
    /// Amount tolerance, in currency units
    pub tolerance: f64,
    pub time_window_hours: f64,
}

impl Default for DuplicateSettings {
    fn default() -> Self {
        DuplicateSettings {
            tolerance: DEFAULT_TOLERANCE,
            time_window_hours: DEFAULT_TIME_WINDOW_HOURS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalySettings {
    pub z_threshold: f64,
}

impl Default for AnomalySettings {
    fn default() -> Self {
        AnomalySettings {
            z_threshold: DEFAULT_Z_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub duplicates: DuplicateSettings,
    pub anomalies: AnomalySettings,
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config = EngineConfig::from_json_str(&content)
            .with_context(|| format!("Failed to load config file: {:?}", path.as_ref()))?;

        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json_str(content: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            serde_json::from_str(content).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [
            ("duplicates.tolerance", self.duplicates.tolerance),
            ("duplicates.time_window_hours", self.duplicates.time_window_hours),
            ("anomalies.z_threshold", self.anomalies.z_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::parameter(
                    name,
                    format!("must be a finite, non-negative number (got {})", value),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.duplicates.tolerance, 0.01);
        assert_eq!(config.duplicates.time_window_hours, 24.0);
        assert_eq!(config.anomalies.z_threshold, 3.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = EngineConfig::from_json_str(r#"{"duplicates": {"tolerance": 0.5}}"#).unwrap();
        assert_eq!(
            config,
            EngineConfig {
                duplicates: DuplicateSettings {
                    tolerance: 0.5,
                    time_window_hours: 24.0,
                },
                anomalies: AnomalySettings::default(),
            }
        );
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = EngineConfig::from_json_str(r#"{"anomalies": {"z_threshold": -2}}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { ref name, .. } if name == "anomalies.z_threshold"));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"duplicates": {{"time_window_hours": 48}}}}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.duplicates.time_window_hours, 48.0);
        assert_eq!(config.duplicates.tolerance, 0.01);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = EngineConfig::from_file("/nonexistent/fin-intel.json").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
