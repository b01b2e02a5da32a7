//! Performance Rating

use crate::DeviationError;
use serde::{Deserialize, Serialize};

/// One-to-five star rating derived from mistakes per minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: Rating = Rating(5);
    pub const MIN: Rating = Rating(1);

    /// Bucket a mistake rate: every 4 mistakes per minute costs one star
    pub fn from_mistakes_per_minute(mistakes_per_minute: f32) -> Self {
        let rate = if mistakes_per_minute.is_nan() {
            0.0
        } else {
            mistakes_per_minute.max(0.0)
        };

        if rate <= 4.0 {
            Rating(5)
        } else if rate <= 8.0 {
            Rating(4)
        } else if rate <= 12.0 {
            Rating(3)
        } else if rate <= 16.0 {
            Rating(2)
        } else {
            Rating(1)
        }
    }

    pub fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = DeviationError;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&stars) {
            Ok(Rating(stars))
        } else {
            Err(DeviationError::InvalidRating(stars))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_buckets() {
        assert_eq!(Rating::from_mistakes_per_minute(0.0).stars(), 5);
        assert_eq!(Rating::from_mistakes_per_minute(4.0).stars(), 5);
        assert_eq!(Rating::from_mistakes_per_minute(4.1).stars(), 4);
        assert_eq!(Rating::from_mistakes_per_minute(8.0).stars(), 4);
        assert_eq!(Rating::from_mistakes_per_minute(12.0).stars(), 3);
        assert_eq!(Rating::from_mistakes_per_minute(16.0).stars(), 2);
        assert_eq!(Rating::from_mistakes_per_minute(16.5).stars(), 1);
    }

    #[test]
    fn test_negative_and_nan_rate_are_best() {
        assert_eq!(Rating::from_mistakes_per_minute(-3.0), Rating::MAX);
        assert_eq!(Rating::from_mistakes_per_minute(f32::NAN), Rating::MAX);
    }

    #[test]
    fn test_rating_serializes_as_number() {
        let json = serde_json::to_string(&Rating::from_mistakes_per_minute(10.0)).unwrap();
        assert_eq!(json, "3");
        assert_eq!(Rating::MIN.to_string(), "1/5");
    }

    #[test]
    fn test_rating_deserialize_checks_range() {
        let rating: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(rating.stars(), 4);

        assert!(serde_json::from_str::<Rating>("0").is_err());
        assert!(serde_json::from_str::<Rating>("6").is_err());
        assert!(serde_json::from_str::<Rating>("200").is_err());
        assert_eq!(Rating::try_from(0), Err(DeviationError::InvalidRating(0)));
    }
}
