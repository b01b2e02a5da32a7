//! Service settings
//!
//! Loaded from an optional TOML file, then `POSE_SYNC__*` environment
//! variables (e.g. `POSE_SYNC__FAULT_DEGREES=70`).

use crate::ServiceError;
use config::{Config, Environment, File, FileFormat};
use deviation::DeviationThresholds;
use reference_scheduler::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use sync_engine::SyncConfig;

/// Runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Spacing of precomputed reference frames (ms)
    pub reference_interval_ms: u64,
    /// Command queue depth of the sync actor
    pub channel_capacity: usize,
    /// Landmarks per frame produced by the pose model
    pub landmark_count: usize,
    pub caution_degrees: f32,
    pub fault_degrees: f32,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let engine = SyncConfig::default();
        Self {
            reference_interval_ms: PlayerConfig::default().interval_ms,
            channel_capacity: 64,
            landmark_count: engine.landmark_count,
            caution_degrees: engine.thresholds.caution_degrees(),
            fault_degrees: engine.thresholds.fault_degrees(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ServiceError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix("POSE_SYNC")
                    .prefix_separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Parse settings from TOML text (no environment overrides)
    pub fn from_toml(text: &str) -> Result<Self, ServiceError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Engine configuration, validating the thresholds
    pub fn sync_config(&self) -> Result<SyncConfig, ServiceError> {
        Ok(SyncConfig {
            landmark_count: self.landmark_count,
            thresholds: DeviationThresholds::new(self.caution_degrees, self.fault_degrees)?,
        })
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            interval_ms: self.reference_interval_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.reference_interval_ms, 300);
        assert_eq!(settings.landmark_count, 33);
        assert_eq!(settings.fault_degrees, 60.0);
        assert!(settings.sync_config().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml("fault_degrees = 70.0\nlog_json = true\n").unwrap();
        assert_eq!(settings.fault_degrees, 70.0);
        assert_eq!(settings.caution_degrees, 30.0);
        assert!(settings.log_json);
        assert_eq!(settings.sync_config().unwrap().thresholds.fault_degrees(), 70.0);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let settings = Settings::from_toml("caution_degrees = 80.0").unwrap();
        assert!(matches!(settings.sync_config(), Err(ServiceError::Thresholds(_))));
    }
}
