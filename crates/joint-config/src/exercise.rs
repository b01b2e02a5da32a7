//! Exercise catalog entries

use crate::{parse_pairs, validate_pairs, ConfigError, JointPair};
use deviation::DeviationThresholds;
use serde::{Deserialize, Serialize};

/// Joint pairs as stored in a catalog: a structured list or the legacy string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JointPairSpec {
    Structured(Vec<JointPair>),
    Text(String),
}

impl JointPairSpec {
    /// Resolve to an ordered pair list (not yet validated)
    pub fn resolve(&self) -> Result<Vec<JointPair>, ConfigError> {
        match self {
            JointPairSpec::Structured(pairs) => Ok(pairs.clone()),
            JointPairSpec::Text(text) => parse_pairs(text),
        }
    }
}

impl From<Vec<JointPair>> for JointPairSpec {
    fn from(pairs: Vec<JointPair>) -> Self {
        JointPairSpec::Structured(pairs)
    }
}

/// A reference exercise and the segments it monitors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Location of the reference video, opaque to the engine
    #[serde(default)]
    pub video_uri: Option<String>,
    pub pairs: JointPairSpec,
    /// Per-exercise tier boundaries; engine defaults apply when absent
    #[serde(default)]
    pub thresholds: Option<DeviationThresholds>,
}

impl ExerciseDefinition {
    pub fn new(name: impl Into<String>, pairs: impl Into<JointPairSpec>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            video_uri: None,
            pairs: pairs.into(),
            thresholds: None,
        }
    }

    /// Resolved and validated joint pairs
    pub fn joint_pairs(&self, landmark_count: usize) -> Result<Vec<JointPair>, ConfigError> {
        let pairs = self.pairs.resolve()?;
        validate_pairs(&pairs, landmark_count)?;
        Ok(pairs)
    }
}
