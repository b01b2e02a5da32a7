//! Sync engine configuration

use deviation::DeviationThresholds;
use joint_config::DEFAULT_LANDMARK_COUNT;
use serde::{Deserialize, Serialize};

/// Sync engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Landmarks per frame produced by the pose model
    pub landmark_count: usize,

    /// Tier boundaries used when an exercise does not override them
    pub thresholds: DeviationThresholds,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            landmark_count: DEFAULT_LANDMARK_COUNT,
            thresholds: DeviationThresholds::default(),
        }
    }
}

impl SyncConfig {
    /// Create strict config (lower thresholds)
    pub fn strict() -> Self {
        Self {
            thresholds: DeviationThresholds::new(20.0, 45.0)
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Create lenient config (higher thresholds)
    pub fn lenient() -> Self {
        Self {
            thresholds: DeviationThresholds::new(40.0, 75.0)
                .unwrap_or_default(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_order() {
        let strict = SyncConfig::strict().thresholds;
        let normal = SyncConfig::default().thresholds;
        let lenient = SyncConfig::lenient().thresholds;
        assert!(strict.fault_degrees() < normal.fault_degrees());
        assert!(normal.fault_degrees() < lenient.fault_degrees());
        assert_eq!(SyncConfig::default().landmark_count, 33);
    }
}
