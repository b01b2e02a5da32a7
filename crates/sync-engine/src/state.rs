//! Session state tracking

use angle_window::{AngleWindowSet, WindowError, WINDOW_CAPACITY};
use deviation::{DeviationThresholds, Tier};
use joint_config::JointPair;
use landmark_math::LandmarkVector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Controller lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// No session
    #[default]
    Idle,
    /// Session created, waiting for both streams
    Armed,
    /// Both streams flowing, reference playback progressing
    Running,
    /// Reference playback held on a fault
    Paused,
    /// Report being produced; the controller returns to `Idle` right after
    Finished,
}

/// Which producer a frame came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Reference,
    Live,
}

impl Stream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::Reference => "reference",
            Stream::Live => "live",
        }
    }
}

/// Everything one exercise attempt accumulates
#[derive(Debug, Clone)]
pub struct SyncSession {
    pub id: Uuid,
    pub pairs: Vec<JointPair>,
    pub thresholds: DeviationThresholds,
    pub windows: AngleWindowSet,

    /// Only ever incremented
    pub mistakes: u32,

    pub started_at_ms: u64,
    pub paused_total_ms: u64,
    pub pause_started_at_ms: Option<u64>,

    pub latest_reference: Option<Vec<LandmarkVector>>,
    pub latest_live: Option<Vec<LandmarkVector>>,

    /// Tiers from the most recent evaluation, one per pair
    pub latest_tiers: Vec<Tier>,
    pub rejected_frames: u64,
    pub evaluated_frames: u64,
}

impl SyncSession {
    pub fn new(
        pairs: Vec<JointPair>,
        thresholds: DeviationThresholds,
        started_at_ms: u64,
    ) -> Result<Self, WindowError> {
        let windows = AngleWindowSet::new(pairs.len(), WINDOW_CAPACITY)?;
        Ok(Self {
            id: Uuid::new_v4(),
            pairs,
            thresholds,
            windows,
            mistakes: 0,
            started_at_ms,
            paused_total_ms: 0,
            pause_started_at_ms: None,
            latest_reference: None,
            latest_live: None,
            latest_tiers: Vec::new(),
            rejected_frames: 0,
            evaluated_frames: 0,
        })
    }

    /// Store a stream's newest vectors, replacing the previous set
    pub fn store(&mut self, stream: Stream, vectors: Vec<LandmarkVector>) {
        match stream {
            Stream::Reference => self.latest_reference = Some(vectors),
            Stream::Live => self.latest_live = Some(vectors),
        }
    }

    /// Both streams have delivered at least one usable frame
    pub fn both_streams_seen(&self) -> bool {
        self.latest_reference.is_some() && self.latest_live.is_some()
    }

    /// Start a pause interval at `now_ms`
    pub fn begin_pause(&mut self, now_ms: u64) {
        self.pause_started_at_ms = Some(now_ms);
    }

    /// Close an open pause interval, returning its length
    pub fn end_pause(&mut self, now_ms: u64) -> Option<u64> {
        let started = self.pause_started_at_ms.take()?;
        let paused = now_ms.saturating_sub(started);
        self.paused_total_ms += paused;
        Some(paused)
    }
}
