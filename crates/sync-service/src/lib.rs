//! Pose Sync Service
//!
//! Runs the synchronization controller behind a single actor task so the
//! reference player and the live camera can feed it from anywhere, and
//! provides settings loading, logging setup, and session replay.

pub mod replay;
pub mod service;
pub mod settings;

pub use replay::{run_replay, LiveSample, ReplayFile};
pub use service::{SessionSource, SyncHandle, SyncService, SyncStatus};
pub use settings::Settings;

use std::str::FromStr;
use thiserror::Error;
use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::FmtSubscriber;

/// Service error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Sync service is not running")]
    ChannelClosed,

    #[error(transparent)]
    Sync(#[from] sync_engine::SyncError),

    #[error("Reference playback failed: {0}")]
    Scheduler(#[from] reference_scheduler::SchedulerError),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Invalid thresholds: {0}")]
    Thresholds(#[from] deviation::DeviationError),

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Initialize logging to stderr.
///
/// `level` takes a tracing level name; unknown names fall back to `info`.
pub fn init_logging(level: &str, json: bool) -> Result<(), SetGlobalDefaultError> {
    let max_level = Level::from_str(level).unwrap_or(Level::INFO);

    if json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(max_level)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(max_level)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    }
}
