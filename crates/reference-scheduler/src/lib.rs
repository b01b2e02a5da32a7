//! Reference Stream Scheduler
//!
//! Replays a precomputed set of reference pose frames at a fixed cadence,
//! holding position while playback is paused and stopping as soon as the
//! owning session goes away.

mod player;

pub use player::{PlaybackState, PlayerConfig, PlayerEvent, PlayerExit, ReferencePlayer};

use thiserror::Error;

/// Reference scheduler errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("Frame interval must be greater than zero")]
    InvalidInterval,

    #[error("Frame receiver closed")]
    ChannelClosed,
}
