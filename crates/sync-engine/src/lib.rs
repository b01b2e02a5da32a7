//! Pose Synchronization Engine
//!
//! Compares a live pose stream against a reference exercise stream:
//! - Per-segment angle between reference and live directions
//! - Moving-average smoothing per joint pair
//! - Severity tiers and fault detection
//! - Edge-triggered pause/resume of reference playback
//! - Mistake counting and mistakes-per-minute scoring

pub mod config;
pub mod controller;
pub mod report;
pub mod state;

pub use config::SyncConfig;
pub use controller::{FrameOutcome, SyncController};
pub use report::{NoopListener, PerformanceReport, PlaybackListener, Transition};
pub use state::{Stream, SyncSession, SyncState};

pub use deviation::{Rating, Tier};
pub use joint_config::{ExerciseDefinition, JointPair};
pub use landmark_math::Landmark;

use thiserror::Error;

/// Sync engine error types
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] joint_config::ConfigError),

    #[error("No active session")]
    NoActiveSession,

    #[error("Session {0} is still active")]
    SessionActive(uuid::Uuid),

    #[error("Smoothing window error: {0}")]
    Window(#[from] angle_window::WindowError),
}
