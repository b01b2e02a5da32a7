//! Joint pair type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered pair of landmark indices identifying one skeletal segment.
///
/// Serializes as a two-element array, e.g. `[12, 14]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct JointPair {
    pub a: usize,
    pub b: usize,
}

impl JointPair {
    pub const fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// `(a, b)` for vector construction
    pub fn indices(&self) -> (usize, usize) {
        (self.a, self.b)
    }
}

impl From<(usize, usize)> for JointPair {
    fn from((a, b): (usize, usize)) -> Self {
        Self { a, b }
    }
}

impl From<JointPair> for (usize, usize) {
    fn from(pair: JointPair) -> Self {
        (pair.a, pair.b)
    }
}

impl fmt::Display for JointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// Render pairs in the textual catalog format, e.g. `[(12, 14), (11, 13)]`
pub fn format_pairs(pairs: &[JointPair]) -> String {
    let body = pairs
        .iter()
        .map(JointPair::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_format() {
        let pairs = [JointPair::new(12, 14), JointPair::new(11, 13)];
        assert_eq!(pairs[0].to_string(), "(12, 14)");
        assert_eq!(format_pairs(&pairs), "[(12, 14), (11, 13)]");
        assert_eq!(format_pairs(&[]), "[]");
    }

    #[test]
    fn test_serde_as_array() {
        let json = serde_json::to_string(&JointPair::new(23, 25)).unwrap();
        assert_eq!(json, "[23,25]");
        let pair: JointPair = serde_json::from_str("[24, 26]").unwrap();
        assert_eq!(pair.indices(), (24, 26));
    }
}
