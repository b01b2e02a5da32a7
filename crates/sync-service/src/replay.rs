//! Session replay
//!
//! Drives a full session from recorded data: the reference frames go
//! through the scheduled player, live samples are injected at their
//! recorded offsets, and the session ends when the reference runs out or
//! when the live recording stops while playback is held.

use crate::{ServiceError, Settings, SyncHandle, SyncService};
use joint_config::ExerciseDefinition;
use landmark_math::Landmark;
use reference_scheduler::{PlaybackState, PlayerExit};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use sync_engine::{PerformanceReport, PlaybackListener, SyncError};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// One live-camera frame captured `at_ms` after the session started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSample {
    pub at_ms: u64,
    pub landmarks: Vec<Landmark>,
}

/// Recorded input for a replayed session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayFile {
    pub exercise: ExerciseDefinition,
    /// Precomputed reference frames; an empty entry means no pose was found
    pub reference: Vec<Vec<Landmark>>,
    #[serde(default)]
    pub live: Vec<LiveSample>,
}

/// Hands the final report back to the replay driver
struct ReportForwarder {
    tx: mpsc::UnboundedSender<PerformanceReport>,
}

impl PlaybackListener for ReportForwarder {
    fn on_pause_requested(&mut self) {
        debug!("Reference playback paused");
    }

    fn on_resume_requested(&mut self) {
        debug!("Reference playback resumed");
    }

    fn on_session_finished(&mut self, report: &PerformanceReport) {
        let _ = self.tx.send(report.clone());
    }
}

/// Replay a recorded session and return its performance report
pub async fn run_replay(
    replay: ReplayFile,
    settings: &Settings,
) -> Result<PerformanceReport, ServiceError> {
    let (report_tx, mut report_rx) = mpsc::unbounded_channel();
    let (handle, service) = SyncService::spawn(
        settings.sync_config()?,
        ReportForwarder { tx: report_tx },
        settings,
    );

    info!(
        exercise = %replay.exercise.name,
        reference_frames = replay.reference.len(),
        live_frames = replay.live.len(),
        "Replaying session"
    );

    let session = handle.start_exercise(replay.exercise).await?;
    let mut player = handle.spawn_reference_player(session, replay.reference)?;

    let live_handle = handle.clone();
    let live_samples = replay.live;
    let started = Instant::now();
    let mut live = tokio::spawn(async move {
        for sample in live_samples {
            sleep_until(started + Duration::from_millis(sample.at_ms)).await;
            if live_handle.live_frame(session, sample.landmarks).await.is_err() {
                break;
            }
        }
    });

    // A recording can stop while playback is held on a fault; the player
    // never resumes then, so the session is ended once the hold is seen.
    let mut playback = handle.playback();
    let report = tokio::select! {
        exit = &mut player => match exit?? {
            PlayerExit::Exhausted => {
                report_rx.recv().await.ok_or(ServiceError::ChannelClosed)
            }
            PlayerExit::Cancelled => {
                warn!(%session, "Reference playback cancelled before the end");
                Err(ServiceError::ChannelClosed)
            }
        },
        held = async {
            let _ = (&mut live).await;
            let held = playback
                .wait_for(|state| *state == PlaybackState::Paused(session))
                .await
                .is_ok();
            held
        } => {
            if held {
                info!(%session, "Live recording ended during a pause, ending session");
                end_held_session(&handle, &mut report_rx).await
            } else {
                Err(ServiceError::ChannelClosed)
            }
        }
    };
    live.abort();
    player.abort();

    handle.shutdown().await?;
    service.await?;
    report
}

/// End a session whose playback is held; the player may have ended it first
async fn end_held_session(
    handle: &SyncHandle,
    report_rx: &mut mpsc::UnboundedReceiver<PerformanceReport>,
) -> Result<PerformanceReport, ServiceError> {
    match handle.end_session().await {
        Err(ServiceError::Sync(SyncError::NoActiveSession)) => {
            report_rx.recv().await.ok_or(ServiceError::ChannelClosed)
        }
        result => result,
    }
}
