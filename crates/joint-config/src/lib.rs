//! Joint-Pair Configuration
//!
//! Parses and validates the ordered list of landmark index pairs that an
//! exercise monitors. The list order fixes which smoothing window belongs
//! to which segment, so nothing here ever re-sorts it.

mod error;
mod exercise;
mod pair;
mod parser;
mod validator;

pub use error::ConfigError;
pub use exercise::{ExerciseDefinition, JointPairSpec};
pub use pair::{format_pairs, JointPair};
pub use parser::parse_pairs;
pub use validator::{validate_pairs, DEFAULT_LANDMARK_COUNT};
