//! Configuration Error Types

use thiserror::Error;

/// Errors while building a joint-pair configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No joint pairs configured
    #[error("Joint-pair list is empty")]
    Empty,

    /// Pair token could not be read as two integers
    #[error("Malformed joint pair #{position}: {token:?}")]
    MalformedPair { position: usize, token: String },

    /// Landmark index beyond the pose model's joint count
    #[error("Joint pair #{position} uses landmark {index}, model has {landmark_count} landmarks")]
    IndexOutOfRange {
        position: usize,
        index: usize,
        landmark_count: usize,
    },

    /// Both ends of a segment are the same landmark
    #[error("Joint pair #{position} joins landmark {index} to itself")]
    DegeneratePair { position: usize, index: usize },

    /// Tier boundaries rejected
    #[error(transparent)]
    Thresholds(#[from] deviation::DeviationError),
}
