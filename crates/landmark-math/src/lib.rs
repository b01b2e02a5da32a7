//! Landmark Vector Math
//!
//! Geometry helpers shared by the reference and live streams:
//! - Segment vectors between two landmarks of a pose frame
//! - Normalization with an explicit zero-vector policy
//! - Clamped angle between two segment directions

mod vector;

pub use vector::{
    angle_between_degrees, normalize, vector_between, vectors_for_pairs, Landmark,
    LandmarkVector, UnitVector,
};

use thiserror::Error;

/// Landmark math error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Landmark index {index} out of bounds for a frame of {len} landmarks")]
    IndexOutOfBounds { index: usize, len: usize },
}
