//! Sync actor
//!
//! Both streams and every lifecycle call go through one bounded channel
//! into a task that owns the [`SyncController`], so frames are processed
//! strictly one at a time. Frames are stamped with the service clock on
//! receipt and dropped when they name a session that is no longer active.

use crate::{ServiceError, Settings};
use joint_config::{ExerciseDefinition, JointPair};
use landmark_math::Landmark;
use reference_scheduler::{
    PlaybackState, PlayerConfig, PlayerEvent, PlayerExit, ReferencePlayer, SchedulerError,
};
use std::sync::Arc;
use sync_engine::{
    PerformanceReport, PlaybackListener, Stream, SyncConfig, SyncController, SyncError,
    SyncState, Tier,
};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How a session's joint pairs are supplied
#[derive(Debug, Clone)]
pub enum SessionSource {
    Pairs(Vec<JointPair>),
    Exercise(ExerciseDefinition),
}

/// Point-in-time view of the controller
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatus {
    pub state: SyncState,
    pub session: Option<Uuid>,
    pub mistakes: u32,
    pub latest_tiers: Vec<Tier>,
}

enum Command {
    Start {
        source: SessionSource,
        reply: oneshot::Sender<Result<Uuid, SyncError>>,
    },
    Frame {
        session: Uuid,
        stream: Stream,
        landmarks: Vec<Landmark>,
    },
    End {
        /// Only end if this session is still the active one
        session: Option<Uuid>,
        reply: Option<oneshot::Sender<Result<PerformanceReport, SyncError>>>,
    },
    Status {
        reply: oneshot::Sender<SyncStatus>,
    },
    Shutdown,
}

impl From<PlayerEvent> for Command {
    fn from(event: PlayerEvent) -> Self {
        match event {
            PlayerEvent::Frame {
                session, landmarks, ..
            } => Command::Frame {
                session,
                stream: Stream::Reference,
                landmarks,
            },
            PlayerEvent::Exhausted { session } => Command::End {
                session: Some(session),
                reply: None,
            },
        }
    }
}

/// Mirrors pause/resume into the playback watch and forwards to the caller's listener
struct PlaybackBridge {
    playback: Arc<watch::Sender<PlaybackState>>,
    inner: Box<dyn PlaybackListener>,
}

impl PlaybackListener for PlaybackBridge {
    fn on_pause_requested(&mut self) {
        self.playback.send_modify(|state| {
            if let PlaybackState::Playing(id) = *state {
                *state = PlaybackState::Paused(id);
            }
        });
        self.inner.on_pause_requested();
    }

    fn on_resume_requested(&mut self) {
        self.playback.send_modify(|state| {
            if let PlaybackState::Paused(id) = *state {
                *state = PlaybackState::Playing(id);
            }
        });
        self.inner.on_resume_requested();
    }

    fn on_session_finished(&mut self, report: &PerformanceReport) {
        self.playback.send_replace(PlaybackState::Idle);
        self.inner.on_session_finished(report);
    }
}

/// Actor owning the synchronization controller
pub struct SyncService {
    controller: SyncController,
    rx: mpsc::Receiver<Command>,
    playback: Arc<watch::Sender<PlaybackState>>,
    epoch: Instant,
}

impl SyncService {
    /// Spawn the actor and return a handle to it
    pub fn spawn<L>(
        config: SyncConfig,
        listener: L,
        settings: &Settings,
    ) -> (SyncHandle, JoinHandle<()>)
    where
        L: PlaybackListener + 'static,
    {
        let (tx, rx) = mpsc::channel(settings.channel_capacity.max(1));
        let (playback_tx, playback_rx) = watch::channel(PlaybackState::Idle);
        let playback = Arc::new(playback_tx);

        let bridge = PlaybackBridge {
            playback: playback.clone(),
            inner: Box::new(listener),
        };
        let service = Self {
            controller: SyncController::new(config, bridge),
            rx,
            playback,
            epoch: Instant::now(),
        };

        let handle = SyncHandle {
            tx,
            playback: playback_rx,
            player_config: settings.player_config(),
        };
        (handle, tokio::spawn(service.run()))
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Process commands until shutdown or every handle is dropped
    pub async fn run(mut self) {
        info!("Sync service started");

        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Start { source, reply } => {
                    let now = self.now_ms();
                    let result = match &source {
                        SessionSource::Pairs(pairs) => {
                            self.controller.start_session(pairs.clone(), now)
                        }
                        SessionSource::Exercise(exercise) => {
                            self.controller.start_exercise(exercise, now)
                        }
                    };
                    match &result {
                        Ok(id) => {
                            self.playback.send_replace(PlaybackState::Playing(*id));
                        }
                        Err(e) => warn!("Session not started: {}", e),
                    }
                    let _ = reply.send(result);
                }
                Command::Frame {
                    session,
                    stream,
                    landmarks,
                } => {
                    if self.controller.session_id() != Some(session) {
                        debug!(
                            %session,
                            stream = stream.as_str(),
                            "Dropping frame for inactive session"
                        );
                        continue;
                    }
                    let now = self.now_ms();
                    self.controller.process_frame(stream, &landmarks, now);
                }
                Command::End { session, reply } => {
                    let stale = session.is_some() && session != self.controller.session_id();
                    let result = if stale {
                        debug!("Ignoring end request for inactive session");
                        Err(SyncError::NoActiveSession)
                    } else {
                        let now = self.now_ms();
                        let result = self.controller.end_session(now);
                        self.playback.send_replace(PlaybackState::Idle);
                        result
                    };
                    match reply {
                        Some(reply) => {
                            let _ = reply.send(result);
                        }
                        None => {
                            if let Err(e) = result {
                                debug!("End request dropped: {}", e);
                            }
                        }
                    }
                }
                Command::Status { reply } => {
                    let _ = reply.send(SyncStatus {
                        state: self.controller.state(),
                        session: self.controller.session_id(),
                        mistakes: self.controller.mistakes(),
                        latest_tiers: self.controller.latest_tiers().to_vec(),
                    });
                }
                Command::Shutdown => break,
            }
        }

        if let Some(id) = self.controller.abort_session() {
            warn!(session = %id, "Service stopping with an unfinished session");
        }
        self.playback.send_replace(PlaybackState::Idle);
        info!("Sync service stopped");
    }
}

/// Cloneable handle for feeding and controlling the sync actor
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::Sender<Command>,
    playback: watch::Receiver<PlaybackState>,
    player_config: PlayerConfig,
}

impl SyncHandle {
    /// Start a session from a structured pair list
    pub async fn start_session(&self, pairs: Vec<JointPair>) -> Result<Uuid, ServiceError> {
        self.start(SessionSource::Pairs(pairs)).await
    }

    /// Start a session from a catalog entry
    pub async fn start_exercise(&self, exercise: ExerciseDefinition) -> Result<Uuid, ServiceError> {
        self.start(SessionSource::Exercise(exercise)).await
    }

    async fn start(&self, source: SessionSource) -> Result<Uuid, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Start { source, reply }).await?;
        Ok(response.await.map_err(|_| ServiceError::ChannelClosed)??)
    }

    /// Queue a reference-video frame
    pub async fn reference_frame(
        &self,
        session: Uuid,
        landmarks: Vec<Landmark>,
    ) -> Result<(), ServiceError> {
        self.send(Command::Frame {
            session,
            stream: Stream::Reference,
            landmarks,
        })
        .await
    }

    /// Queue a live-camera frame
    pub async fn live_frame(
        &self,
        session: Uuid,
        landmarks: Vec<Landmark>,
    ) -> Result<(), ServiceError> {
        self.send(Command::Frame {
            session,
            stream: Stream::Live,
            landmarks,
        })
        .await
    }

    /// Finish the active session and return its report
    pub async fn end_session(&self) -> Result<PerformanceReport, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::End {
            session: None,
            reply: Some(reply),
        })
        .await?;
        Ok(response.await.map_err(|_| ServiceError::ChannelClosed)??)
    }

    pub async fn status(&self) -> Result<SyncStatus, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Status { reply }).await?;
        response.await.map_err(|_| ServiceError::ChannelClosed)
    }

    /// Stop the actor, abandoning any active session
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.send(Command::Shutdown).await
    }

    /// Playback state as published by the actor
    pub fn playback(&self) -> watch::Receiver<PlaybackState> {
        self.playback.clone()
    }

    /// Replay precomputed reference frames into `session`.
    ///
    /// The player follows the actor's pause/resume state, ends the session
    /// when it runs out of frames, and stops by itself once the session is
    /// no longer active.
    pub fn spawn_reference_player(
        &self,
        session: Uuid,
        frames: Vec<Vec<Landmark>>,
    ) -> Result<JoinHandle<Result<PlayerExit, SchedulerError>>, ServiceError> {
        let player = ReferencePlayer::new(session, frames, self.player_config.clone())?;
        Ok(tokio::spawn(player.run(self.tx.clone(), self.playback.clone())))
    }

    async fn send(&self, command: Command) -> Result<(), ServiceError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| ServiceError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync_engine::NoopListener;

    fn frame(degrees: f32) -> Vec<Landmark> {
        let radians = degrees.to_radians();
        vec![
            Landmark::new(0.0, 0.0, 0.0),
            Landmark::new(radians.cos(), radians.sin(), 0.0),
        ]
    }

    fn spawn() -> (SyncHandle, JoinHandle<()>) {
        SyncService::spawn(SyncConfig::default(), NoopListener, &Settings::default())
    }

    #[tokio::test]
    async fn test_fault_publishes_pause() {
        let (handle, _task) = spawn();
        let session = handle.start_session(vec![JointPair::new(1, 0)]).await.unwrap();
        assert_eq!(*handle.playback().borrow(), PlaybackState::Playing(session));

        handle.reference_frame(session, frame(0.0)).await.unwrap();
        handle.live_frame(session, frame(90.0)).await.unwrap();

        let status = handle.status().await.unwrap();
        assert_eq!(status.state, SyncState::Paused);
        assert_eq!(status.mistakes, 1);
        assert_eq!(status.latest_tiers, vec![Tier::Fault]);
        assert_eq!(*handle.playback().borrow(), PlaybackState::Paused(session));
    }

    #[tokio::test]
    async fn test_stale_frames_dropped() {
        let (handle, _task) = spawn();
        let old = handle.start_session(vec![JointPair::new(1, 0)]).await.unwrap();
        handle.end_session().await.unwrap();
        let current = handle.start_session(vec![JointPair::new(1, 0)]).await.unwrap();

        handle.reference_frame(old, frame(0.0)).await.unwrap();
        handle.live_frame(old, frame(90.0)).await.unwrap();

        let status = handle.status().await.unwrap();
        assert_eq!(status.session, Some(current));
        assert_eq!(status.state, SyncState::Armed);
        assert_eq!(status.mistakes, 0);
    }

    #[tokio::test]
    async fn test_configuration_error_surfaces() {
        let (handle, _task) = spawn();
        let result = handle.start_session(vec![]).await;
        assert!(matches!(result, Err(ServiceError::Sync(SyncError::Configuration(_)))));
        assert!(matches!(
            handle.end_session().await,
            Err(ServiceError::Sync(SyncError::NoActiveSession))
        ));
    }

    #[tokio::test]
    async fn test_shutdown_stops_actor() {
        let (handle, task) = spawn();
        handle.start_session(vec![JointPair::new(1, 0)]).await.unwrap();
        handle.shutdown().await.unwrap();
        task.await.unwrap();

        assert_eq!(*handle.playback().borrow(), PlaybackState::Idle);
        assert!(matches!(handle.status().await, Err(ServiceError::ChannelClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_end_cancels_player() {
        let (handle, _task) = spawn();
        let session = handle.start_session(vec![JointPair::new(1, 0)]).await.unwrap();
        let player = handle
            .spawn_reference_player(session, vec![frame(0.0); 1_000])
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(1_000)).await;
        handle.end_session().await.unwrap();

        assert_eq!(player.await.unwrap(), Ok(PlayerExit::Cancelled));
    }
}
