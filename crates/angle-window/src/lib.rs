//! Angle Smoothing Windows
//!
//! Provides one bounded FIFO of recent angle samples per monitored joint
//! pair, reporting the moving average after every push.

mod window;

pub use window::{AngleWindow, AngleWindowSet, WINDOW_CAPACITY};

use thiserror::Error;

/// Smoothing window errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// A window must hold at least one sample
    #[error("Window capacity must be greater than zero")]
    ZeroCapacity,

    /// Angle batch does not line up with the configured joint pairs
    #[error("Expected {expected} angles (one per joint pair), got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
