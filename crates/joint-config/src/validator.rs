//! Joint-Pair Validation

use crate::{ConfigError, JointPair};

/// Landmarks per frame in the BlazePose topology
pub const DEFAULT_LANDMARK_COUNT: usize = 33;

/// Check a pair list against the pose model's landmark count.
///
/// The list must be non-empty, every index must exist in a full frame and
/// no pair may join a landmark to itself.
pub fn validate_pairs(pairs: &[JointPair], landmark_count: usize) -> Result<(), ConfigError> {
    if pairs.is_empty() {
        return Err(ConfigError::Empty);
    }

    for (position, pair) in pairs.iter().enumerate() {
        if let Some(index) = [pair.a, pair.b]
            .into_iter()
            .find(|&index| index >= landmark_count)
        {
            return Err(ConfigError::IndexOutOfRange {
                position,
                index,
                landmark_count,
            });
        }
        if pair.a == pair.b {
            return Err(ConfigError::DegeneratePair {
                position,
                index: pair.a,
            });
        }
    }

    Ok(())
}
