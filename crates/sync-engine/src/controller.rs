//! Synchronization controller
//!
//! Owns the active [`SyncSession`] and drives the
//! `Idle -> Armed -> Running <-> Paused -> Finished -> Idle` lifecycle.
//! Every method takes `&mut self`; callers feeding it from several
//! producers must serialize access (see the `sync-service` actor).
//!
//! Frame timestamps and the `now_ms` arguments must come from one clock.

use crate::report::{PerformanceReport, PlaybackListener, Transition};
use crate::state::{Stream, SyncSession, SyncState};
use crate::{SyncConfig, SyncError};
use deviation::{any_fault, DeviationThresholds, Tier};
use joint_config::{validate_pairs, ExerciseDefinition, JointPair};
use landmark_math::{angle_between_degrees, normalize, vectors_for_pairs, Landmark};
use metrics::counter;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// What a single frame did to the session
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No session is active
    Ignored,
    /// Frame too short for the configured joint pairs; nothing changed
    Rejected,
    /// Stored, but the other stream has not delivered yet
    Deferred,
    /// Angles smoothed and classified, one entry per joint pair
    Evaluated {
        smoothed: Vec<f32>,
        tiers: Vec<Tier>,
        transition: Option<Transition>,
    },
}

impl FrameOutcome {
    pub fn transition(&self) -> Option<Transition> {
        match self {
            FrameOutcome::Evaluated { transition, .. } => *transition,
            _ => None,
        }
    }
}

/// Pose synchronization controller
pub struct SyncController {
    config: SyncConfig,
    listener: Box<dyn PlaybackListener>,
    state: SyncState,
    session: Option<SyncSession>,
}

impl SyncController {
    /// Create an idle controller
    pub fn new<L>(config: SyncConfig, listener: L) -> Self
    where
        L: PlaybackListener + 'static,
    {
        Self {
            config,
            listener: Box::new(listener),
            state: SyncState::Idle,
            session: None,
        }
    }

    /// Arm a session for the given joint pairs.
    ///
    /// Fails without starting anything if the list is empty, references a
    /// landmark the model does not produce, or a session is already active.
    pub fn start_session(&mut self, pairs: Vec<JointPair>, now_ms: u64) -> Result<Uuid, SyncError> {
        let thresholds = self.config.thresholds;
        self.arm(pairs, thresholds, now_ms)
    }

    /// Arm a session from a catalog entry, honoring its threshold override
    pub fn start_exercise(
        &mut self,
        exercise: &ExerciseDefinition,
        now_ms: u64,
    ) -> Result<Uuid, SyncError> {
        let pairs = exercise.joint_pairs(self.config.landmark_count)?;
        let thresholds = exercise.thresholds.unwrap_or(self.config.thresholds);
        info!("Starting exercise '{}'", exercise.name);
        self.arm(pairs, thresholds, now_ms)
    }

    fn arm(
        &mut self,
        pairs: Vec<JointPair>,
        thresholds: DeviationThresholds,
        now_ms: u64,
    ) -> Result<Uuid, SyncError> {
        if let Some(session) = &self.session {
            return Err(SyncError::SessionActive(session.id));
        }
        validate_pairs(&pairs, self.config.landmark_count)?;

        let session = SyncSession::new(pairs, thresholds, now_ms)?;
        let id = session.id;
        info!(
            session = %id,
            pairs = session.pairs.len(),
            fault_degrees = thresholds.fault_degrees(),
            "Session armed"
        );

        self.session = Some(session);
        self.state = SyncState::Armed;
        Ok(id)
    }

    /// Feed a frame from the reference video
    pub fn on_reference_frame(
        &mut self,
        landmarks: &[Landmark],
        timestamp_ms: u64,
    ) -> FrameOutcome {
        self.process_frame(Stream::Reference, landmarks, timestamp_ms)
    }

    /// Feed a frame from the live camera
    pub fn on_live_frame(&mut self, landmarks: &[Landmark], timestamp_ms: u64) -> FrameOutcome {
        self.process_frame(Stream::Live, landmarks, timestamp_ms)
    }

    /// Convert, store, and (once both streams exist) evaluate one frame
    pub fn process_frame(
        &mut self,
        stream: Stream,
        landmarks: &[Landmark],
        timestamp_ms: u64,
    ) -> FrameOutcome {
        let Some(session) = self.session.as_mut() else {
            debug!(stream = stream.as_str(), "Frame ignored: no active session");
            return FrameOutcome::Ignored;
        };

        let pairs = session.pairs.iter().map(JointPair::indices);
        let vectors = match vectors_for_pairs(landmarks, pairs) {
            Ok(vectors) => vectors,
            Err(e) => {
                session.rejected_frames += 1;
                counter!("pose_sync_frames_rejected_total").increment(1);
                warn!(
                    session = %session.id,
                    stream = stream.as_str(),
                    "Frame rejected: {}", e
                );
                return FrameOutcome::Rejected;
            }
        };
        session.store(stream, vectors);

        let (Some(reference), Some(live)) = (&session.latest_reference, &session.latest_live) else {
            debug!(stream = stream.as_str(), "Waiting for the other stream");
            return FrameOutcome::Deferred;
        };

        let angles: Vec<f32> = reference
            .iter()
            .zip(live)
            .map(|(r, l)| angle_between_degrees(normalize(*r), normalize(*l)))
            .collect();

        let smoothed = match session.windows.push_all(&angles) {
            Ok(smoothed) => smoothed,
            Err(e) => {
                session.rejected_frames += 1;
                error!(session = %session.id, "Vector sets out of step: {}", e);
                return FrameOutcome::Rejected;
            }
        };

        let tiers: Vec<Tier> = smoothed
            .iter()
            .map(|&angle| session.thresholds.classify(angle))
            .collect();
        let fault = any_fault(&tiers);
        session.latest_tiers = tiers.clone();
        session.evaluated_frames += 1;
        debug!(
            stream = stream.as_str(),
            ?smoothed,
            fault,
            "Frame evaluated"
        );

        if self.state == SyncState::Armed {
            info!("Both streams live, session running");
            self.state = SyncState::Running;
        }

        let transition = self.apply_fault(fault, timestamp_ms);
        FrameOutcome::Evaluated {
            smoothed,
            tiers,
            transition,
        }
    }

    /// Edge-triggered pause/resume
    fn apply_fault(&mut self, fault: bool, now_ms: u64) -> Option<Transition> {
        let session = self.session.as_mut()?;

        match (self.state, fault) {
            (SyncState::Running, true) => {
                session.mistakes += 1;
                session.begin_pause(now_ms);
                self.state = SyncState::Paused;
                counter!("pose_sync_mistakes_total").increment(1);
                counter!("pose_sync_pauses_total").increment(1);
                info!(
                    session = %session.id,
                    mistakes = session.mistakes,
                    "Fault detected, pausing reference playback"
                );
                self.listener.on_pause_requested();
                Some(Transition::Paused)
            }
            (SyncState::Paused, false) => {
                let paused_ms = session.end_pause(now_ms).unwrap_or(0);
                self.state = SyncState::Running;
                info!(session = %session.id, paused_ms, "Posture recovered, resuming playback");
                self.listener.on_resume_requested();
                Some(Transition::Resumed)
            }
            _ => None,
        }
    }

    /// Finish the session and report mistakes per active minute.
    ///
    /// An open pause is closed at `now_ms` before the rate is computed.
    pub fn end_session(&mut self, now_ms: u64) -> Result<PerformanceReport, SyncError> {
        let Some(mut session) = self.session.take() else {
            return Err(SyncError::NoActiveSession);
        };
        self.state = SyncState::Finished;

        if let Some(paused_ms) = session.end_pause(now_ms) {
            debug!(paused_ms, "Closed pause interval at session end");
        }

        let duration_ms = now_ms.saturating_sub(session.started_at_ms);
        let report = PerformanceReport::compute(
            session.id,
            session.mistakes,
            duration_ms,
            session.paused_total_ms,
        );
        if report.active_duration_ms == 0 {
            warn!(
                session = %session.id,
                "No active exercise time, reporting 0 mistakes per minute"
            );
        }

        info!(
            session = %session.id,
            mistakes = report.mistakes,
            mistakes_per_minute = report.mistakes_per_minute,
            rating = report.rating.stars(),
            rejected_frames = session.rejected_frames,
            "Session finished"
        );
        self.listener.on_session_finished(&report);
        self.state = SyncState::Idle;
        Ok(report)
    }

    /// Drop the active session without reporting
    pub fn abort_session(&mut self) -> Option<Uuid> {
        let session = self.session.take()?;
        self.state = SyncState::Idle;
        info!(session = %session.id, "Session abandoned");
        Some(session.id)
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn session(&self) -> Option<&SyncSession> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn mistakes(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.mistakes)
    }

    /// Tier per joint pair from the latest evaluation (for skeleton overlays)
    pub fn latest_tiers(&self) -> &[Tier] {
        self.session
            .as_ref()
            .map_or(&[][..], |s| s.latest_tiers.as_slice())
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}
