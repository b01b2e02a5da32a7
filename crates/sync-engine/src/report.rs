//! Playback signals and end-of-exercise reporting

use deviation::Rating;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary handed to the performance-reporting collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub session_id: Uuid,
    pub mistakes: u32,
    pub mistakes_per_minute: f32,
    /// Wall time from session start to end, pauses included
    pub exercise_duration_ms: u64,
    /// Exercise time with pauses removed
    pub active_duration_ms: u64,
    pub rating: Rating,
}

impl PerformanceReport {
    /// Build a report; a zero-length active period yields a rate of 0
    pub fn compute(
        session_id: Uuid,
        mistakes: u32,
        exercise_duration_ms: u64,
        paused_ms: u64,
    ) -> Self {
        let active_duration_ms = exercise_duration_ms.saturating_sub(paused_ms);
        let active_minutes = active_duration_ms as f64 / 60_000.0;
        let mistakes_per_minute = if active_minutes > 0.0 {
            (mistakes as f64 / active_minutes) as f32
        } else {
            0.0
        };

        Self {
            session_id,
            mistakes,
            mistakes_per_minute,
            exercise_duration_ms,
            active_duration_ms,
            rating: Rating::from_mistakes_per_minute(mistakes_per_minute),
        }
    }
}

/// Pause/resume state change produced by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Paused,
    Resumed,
}

/// Callbacks consumed by the reference playback collaborator.
///
/// Each method fires at most once per state edge.
pub trait PlaybackListener: Send {
    fn on_pause_requested(&mut self);

    fn on_resume_requested(&mut self);

    fn on_session_finished(&mut self, _report: &PerformanceReport) {}
}

/// Listener that ignores every signal
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl PlaybackListener for NoopListener {
    fn on_pause_requested(&mut self) {}

    fn on_resume_requested(&mut self) {}
}
