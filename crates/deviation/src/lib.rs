//! Deviation Classification
//!
//! Maps smoothed joint angles to severity tiers, decides whether a frame
//! is a fault, and turns a session's mistake rate into a star rating.

mod classifier;
mod rating;

pub use classifier::{any_fault, classify, DeviationThresholds, Tier};
pub use rating::Rating;

use thiserror::Error;

/// Classifier configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviationError {
    #[error("Invalid thresholds: caution {caution}° must be >= 0 and below fault {fault}°")]
    InvalidThresholds { caution: f32, fault: f32 },

    #[error("Invalid rating {0}: must be between 1 and 5 stars")]
    InvalidRating(u8),
}
