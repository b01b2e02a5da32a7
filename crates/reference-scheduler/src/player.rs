//! Reference Player Implementation

use crate::SchedulerError;
use landmark_math::Landmark;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

/// Configuration for the reference player
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Spacing of the precomputed frames in milliseconds (default: 300)
    pub interval_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { interval_ms: 300 }
    }
}

/// Playback state published by the session owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(Uuid),
    Paused(Uuid),
}

impl PlaybackState {
    pub fn session(&self) -> Option<Uuid> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Playing(id) | PlaybackState::Paused(id) => Some(*id),
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused(_))
    }
}

/// Output of the player
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Reference landmarks for the current playback position
    Frame {
        session: Uuid,
        index: usize,
        landmarks: Vec<Landmark>,
    },
    /// Playback ran past the last frame
    Exhausted { session: Uuid },
}

/// Why the player stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerExit {
    Exhausted,
    Cancelled,
}

/// Playback time with paused intervals removed
#[derive(Debug)]
struct ActiveClock {
    started: Instant,
    paused_total: Duration,
    paused_since: Option<Instant>,
}

impl ActiveClock {
    fn new(started: Instant) -> Self {
        Self {
            started,
            paused_total: Duration::ZERO,
            paused_since: None,
        }
    }

    fn observe(&mut self, paused: bool, now: Instant) {
        match (paused, self.paused_since) {
            (true, None) => self.paused_since = Some(now),
            (false, Some(since)) => {
                self.paused_total += now.saturating_duration_since(since);
                self.paused_since = None;
            }
            _ => {}
        }
    }

    fn active(&self, now: Instant) -> Duration {
        let open_pause = self
            .paused_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or_default();
        now.saturating_duration_since(self.started)
            .saturating_sub(self.paused_total + open_pause)
    }
}

/// Periodic producer of reference frames for one session
pub struct ReferencePlayer {
    session: Uuid,
    frames: Vec<Vec<Landmark>>,
    config: PlayerConfig,
}

impl ReferencePlayer {
    /// Create a player over precomputed frames spaced `interval_ms` apart.
    ///
    /// An empty landmark list marks a frame where no pose was found.
    pub fn new(
        session: Uuid,
        frames: Vec<Vec<Landmark>>,
        config: PlayerConfig,
    ) -> Result<Self, SchedulerError> {
        if config.interval_ms == 0 {
            return Err(SchedulerError::InvalidInterval);
        }
        Ok(Self {
            session,
            frames,
            config,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Playback length excluding pauses
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.config.interval_ms * self.frames.len() as u64)
    }

    /// Run until the frames run out or the session stops playing.
    ///
    /// The frame index follows active playback time, so while paused the
    /// same frame keeps being delivered. Any playback state that does not
    /// name this player's session stops it before the next delivery.
    pub async fn run<T>(
        self,
        tx: mpsc::Sender<T>,
        mut playback: watch::Receiver<PlaybackState>,
    ) -> Result<PlayerExit, SchedulerError>
    where
        T: From<PlayerEvent> + Send,
    {
        let interval = Duration::from_millis(self.config.interval_ms);
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut clock = ActiveClock::new(Instant::now());

        info!(
            session = %self.session,
            frames = self.frames.len(),
            interval_ms = self.config.interval_ms,
            "Starting reference playback"
        );

        loop {
            tokio::select! {
                changed = playback.changed() => {
                    if changed.is_err() {
                        info!(
                            session = %self.session,
                            "Playback owner gone, stopping reference playback"
                        );
                        return Ok(PlayerExit::Cancelled);
                    }
                    let state = *playback.borrow_and_update();
                    if state.session() != Some(self.session) {
                        info!(
                            session = %self.session,
                            "Session stopped, cancelling reference playback"
                        );
                        return Ok(PlayerExit::Cancelled);
                    }
                    clock.observe(state.is_paused(), Instant::now());
                }
                _ = ticker.tick() => {
                    let state = *playback.borrow();
                    if state.session() != Some(self.session) {
                        info!(
                            session = %self.session,
                            "Session stopped, cancelling reference playback"
                        );
                        return Ok(PlayerExit::Cancelled);
                    }
                    let now = Instant::now();
                    clock.observe(state.is_paused(), now);

                    let active_ms = clock.active(now).as_millis();
                    let index = (active_ms / self.config.interval_ms as u128) as usize;
                    if index >= self.frames.len() {
                        info!(session = %self.session, "Reference playback finished");
                        tx.send(PlayerEvent::Exhausted { session: self.session }.into())
                            .await
                            .map_err(|_| SchedulerError::ChannelClosed)?;
                        return Ok(PlayerExit::Exhausted);
                    }

                    let landmarks = &self.frames[index];
                    if landmarks.is_empty() {
                        debug!(index, "No pose in reference frame, skipping");
                        continue;
                    }

                    let event = PlayerEvent::Frame {
                        session: self.session,
                        index,
                        landmarks: landmarks.clone(),
                    };
                    tx.send(event.into())
                        .await
                        .map_err(|_| SchedulerError::ChannelClosed)?;
                }
            }
        }
    }
}
