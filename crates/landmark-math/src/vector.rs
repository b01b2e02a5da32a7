//! Landmark and segment vector types

use crate::MathError;
use serde::{Deserialize, Serialize};
use std::ops::{Neg, Sub};

/// 3D landmark produced by the pose model
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Sub for Landmark {
    type Output = LandmarkVector;

    fn sub(self, rhs: Self) -> LandmarkVector {
        LandmarkVector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Direction of a skeletal segment (`landmark[a] - landmark[b]`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl LandmarkVector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn magnitude(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Neg for LandmarkVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// A [`LandmarkVector`] of unit length, or the zero vector for degenerate input
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitVector(LandmarkVector);

impl UnitVector {
    pub fn as_vector(self) -> LandmarkVector {
        self.0
    }

    pub fn dot(self, other: Self) -> f32 {
        self.0.dot(other.0)
    }

    pub fn is_zero(self) -> bool {
        self.0 == LandmarkVector::ZERO
    }
}

impl Neg for UnitVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Segment vector `landmarks[a] - landmarks[b]`
pub fn vector_between(
    landmarks: &[Landmark],
    a: usize,
    b: usize,
) -> Result<LandmarkVector, MathError> {
    let len = landmarks.len();
    let first = landmarks
        .get(a)
        .ok_or(MathError::IndexOutOfBounds { index: a, len })?;
    let second = landmarks
        .get(b)
        .ok_or(MathError::IndexOutOfBounds { index: b, len })?;
    Ok(*first - *second)
}

/// Convert one frame into a vector per joint pair, keeping pair order.
///
/// Fails on the first pair that does not fit the frame; no partial result
/// is returned.
pub fn vectors_for_pairs<I>(
    landmarks: &[Landmark],
    pairs: I,
) -> Result<Vec<LandmarkVector>, MathError>
where
    I: IntoIterator<Item = (usize, usize)>,
{
    pairs
        .into_iter()
        .map(|(a, b)| vector_between(landmarks, a, b))
        .collect()
}

/// Normalize to unit length.
///
/// A zero-magnitude vector maps to the zero vector instead of dividing by
/// zero. Its angle against any direction then comes out as 90°, which the
/// classifier reports as a fault; callers accept that approximation.
pub fn normalize(v: LandmarkVector) -> UnitVector {
    let magnitude = v.magnitude();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return UnitVector(LandmarkVector::ZERO);
    }
    UnitVector(LandmarkVector::new(
        v.x / magnitude,
        v.y / magnitude,
        v.z / magnitude,
    ))
}

/// Angle between two directions in degrees, in `[0, 180]`
pub fn angle_between_degrees(u: UnitVector, v: UnitVector) -> f32 {
    // Rounding can push the dot product of unit vectors just past ±1
    let cosine = u.dot(v).clamp(-1.0, 1.0);
    cosine.acos().to_degrees()
}
