//! Severity Tier Classification

use crate::DeviationError;
use serde::{Deserialize, Serialize};

/// Severity of a joint pair's angular deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Caution,
    Fault,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Good => "good",
            Tier::Caution => "caution",
            Tier::Fault => "fault",
        }
    }
}

/// Tier boundaries in degrees (inclusive lower bound)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct DeviationThresholds {
    caution_degrees: f32,
    fault_degrees: f32,
}

#[derive(Deserialize)]
struct RawThresholds {
    caution_degrees: f32,
    fault_degrees: f32,
}

impl TryFrom<RawThresholds> for DeviationThresholds {
    type Error = DeviationError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Self::new(raw.caution_degrees, raw.fault_degrees)
    }
}

impl Default for DeviationThresholds {
    fn default() -> Self {
        Self {
            caution_degrees: 30.0,
            fault_degrees: 60.0,
        }
    }
}

impl DeviationThresholds {
    /// Create thresholds, requiring `0 <= caution < fault`
    pub fn new(caution_degrees: f32, fault_degrees: f32) -> Result<Self, DeviationError> {
        let valid = caution_degrees.is_finite()
            && fault_degrees.is_finite()
            && caution_degrees >= 0.0
            && caution_degrees < fault_degrees;
        if !valid {
            return Err(DeviationError::InvalidThresholds {
                caution: caution_degrees,
                fault: fault_degrees,
            });
        }
        Ok(Self {
            caution_degrees,
            fault_degrees,
        })
    }

    pub fn caution_degrees(&self) -> f32 {
        self.caution_degrees
    }

    pub fn fault_degrees(&self) -> f32 {
        self.fault_degrees
    }

    /// Tier for a smoothed angle
    pub fn classify(&self, smoothed_degrees: f32) -> Tier {
        if smoothed_degrees >= self.fault_degrees {
            Tier::Fault
        } else if smoothed_degrees >= self.caution_degrees {
            Tier::Caution
        } else {
            Tier::Good
        }
    }
}

/// Classify with the default 30°/60° boundaries
pub fn classify(smoothed_degrees: f32) -> Tier {
    DeviationThresholds::default().classify(smoothed_degrees)
}

/// True when at least one joint pair is in the fault tier
pub fn any_fault(tiers: &[Tier]) -> bool {
    tiers.iter().any(|tier| *tier == Tier::Fault)
}
