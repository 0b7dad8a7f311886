//! Playback manager - core orchestration
//!
//! Owns the single active sound, the queue and the session state. Every
//! mutation publishes a fresh [`SessionSnapshot`] on a watch channel and
//! emits [`PlaybackEvent`]s on a broadcast channel.
//!
//! Status ticks from a sound are forwarded into a [`StatusFeed`] tagged with
//! the generation of the load that produced them. The owner of the manager
//! (normally the [`PlaybackSession`](crate::PlaybackSession) task) drains the
//! feed and hands each tick back to [`PlaybackManager::on_status`], which
//! drops ticks from superseded loads.

use crate::{
    engine::{AudioEngine, EngineStatus, Sound, StatusStream},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    queue::PlaybackQueue,
    types::{PlaybackConfig, PlaybackState, SessionSnapshot},
};
use seedtune_core::Track;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Engine status tagged with the load generation that subscribed to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTick {
    /// Generation of the load this tick belongs to
    pub generation: u64,

    /// Status reported by the engine
    pub status: EngineStatus,
}

/// Receiving side of the forwarded status ticks
#[derive(Debug)]
pub struct StatusFeed {
    rx: mpsc::UnboundedReceiver<StatusTick>,
}

impl StatusFeed {
    /// Wait for the next tick
    ///
    /// Returns `None` once the manager has been dropped.
    pub async fn recv(&mut self) -> Option<StatusTick> {
        self.rx.recv().await
    }

    /// Take a tick if one is already queued
    pub fn try_recv(&mut self) -> Option<StatusTick> {
        self.rx.try_recv().ok()
    }
}

/// How a load changes the queue
enum QueueUpdate {
    /// Ad-hoc single track, queue dropped
    Clear,
    /// New queue, cursor on the first track
    Replace(Vec<Track>),
    /// Cursor moves within the existing queue
    MoveTo(usize),
}

/// Playback session manager
pub struct PlaybackManager {
    engine: Arc<dyn AudioEngine>,
    config: PlaybackConfig,

    queue: PlaybackQueue,
    current_track: Option<Track>,
    sound: Option<Box<dyn Sound>>,
    forwarder: Option<JoinHandle<()>>,

    state: PlaybackState,
    position_ms: u64,
    duration_ms: u64,
    is_full_screen: bool,
    generation: u64,

    snapshot_tx: watch::Sender<SessionSnapshot>,
    events_tx: broadcast::Sender<PlaybackEvent>,
    feed_tx: mpsc::UnboundedSender<StatusTick>,
}

impl PlaybackManager {
    /// Create an empty session
    ///
    /// The returned [`StatusFeed`] must be drained and fed back through
    /// [`on_status`](Self::on_status) for auto-advance and position updates.
    pub fn new(engine: Arc<dyn AudioEngine>, config: PlaybackConfig) -> (Self, StatusFeed) {
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::default());
        let (events_tx, _) = broadcast::channel(config.event_capacity.max(1));
        let (feed_tx, feed_rx) = mpsc::unbounded_channel();

        let manager = Self {
            engine,
            config,
            queue: PlaybackQueue::new(),
            current_track: None,
            sound: None,
            forwarder: None,
            state: PlaybackState::Empty,
            position_ms: 0,
            duration_ms: 0,
            is_full_screen: false,
            generation: 0,
            snapshot_tx,
            events_tx,
            feed_tx,
        };

        (manager, StatusFeed { rx: feed_rx })
    }

    // ===== Observation =====

    /// Current session view
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_track: self.current_track.clone(),
            state: self.state,
            position_ms: self.position_ms,
            duration_ms: self.duration_ms,
            is_full_screen: self.is_full_screen,
            queue: self.queue.tracks(),
            cursor: self.queue.cursor(),
            generation: self.generation,
        }
    }

    /// Subscribe to snapshots; dropping the receiver unsubscribes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Subscribe to playback events
    pub fn events(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events_tx.subscribe()
    }

    /// Sender half of the snapshot channel, for handles created later
    pub(crate) fn snapshot_sender(&self) -> &watch::Sender<SessionSnapshot> {
        &self.snapshot_tx
    }

    /// Sender half of the event channel, for handles created later
    pub(crate) fn event_sender(&self) -> &broadcast::Sender<PlaybackEvent> {
        &self.events_tx
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    // ===== Commands =====

    /// Play a single track, dropping any queue
    ///
    /// # Errors
    /// - `MissingPreview` if the track has no preview URL (session untouched)
    /// - `Engine` if the preview cannot be loaded (session and queue fall back
    ///   to empty)
    pub async fn play_track(&mut self, track: Track) -> Result<()> {
        self.load_track(track, QueueUpdate::Clear).await
    }

    /// Replace the queue and play its first track
    ///
    /// # Errors
    /// - `QueueEmpty` if `tracks` is empty (session untouched)
    /// - otherwise as [`play_track`](Self::play_track)
    pub async fn play_track_list(&mut self, tracks: Vec<Track>) -> Result<()> {
        let Some(first) = tracks.first().cloned() else {
            return Err(PlaybackError::QueueEmpty);
        };
        self.load_track(first, QueueUpdate::Replace(tracks)).await
    }

    /// Advance to the next queued track, or clear playback at the end
    ///
    /// No-op on an empty session.
    ///
    /// # Errors
    /// As [`play_track`](Self::play_track)
    pub async fn play_next_track(&mut self) -> Result<()> {
        if self.current_track.is_none() {
            return Ok(());
        }

        let next = self
            .queue
            .next_index()
            .and_then(|index| self.queue.get(index).cloned().map(|track| (index, track)));

        match next {
            Some((index, track)) => self.load_track(track, QueueUpdate::MoveTo(index)).await,
            None => {
                self.clear_playback().await?;
                info!("Reached end of queue");
                self.emit(PlaybackEvent::QueueEnded);
                Ok(())
            }
        }
    }

    /// Step back to the previous queued track
    ///
    /// No-op at the start of the queue and on an empty session.
    ///
    /// # Errors
    /// As [`play_track`](Self::play_track)
    pub async fn play_previous_track(&mut self) -> Result<()> {
        if self.current_track.is_none() {
            return Ok(());
        }

        let previous = self
            .queue
            .previous_index()
            .and_then(|index| self.queue.get(index).cloned().map(|track| (index, track)));

        match previous {
            Some((index, track)) => self.load_track(track, QueueUpdate::MoveTo(index)).await,
            None => Ok(()),
        }
    }

    /// Pause when playing, resume when paused
    ///
    /// No-op without a loaded sound.
    ///
    /// # Errors
    /// Returns `Engine` if the sound rejects the call
    pub async fn toggle_play_pause(&mut self) -> Result<()> {
        let Some(sound) = self.sound.as_ref() else {
            return Ok(());
        };

        let next_state = match self.state {
            PlaybackState::Playing => {
                let result = sound.pause().await;
                self.check(result)?;
                PlaybackState::Paused
            }
            PlaybackState::Paused => {
                let result = sound.play().await;
                self.check(result)?;
                PlaybackState::Playing
            }
            PlaybackState::Empty | PlaybackState::Loading => return Ok(()),
        };

        self.set_state(next_state);
        self.publish();
        Ok(())
    }

    /// Seek within the current track
    ///
    /// The local position is left alone; the next tick reports the new one.
    ///
    /// # Errors
    /// Returns `Engine` if the sound rejects the call
    pub async fn seek_to_position(&mut self, position_ms: u64) -> Result<()> {
        let Some(sound) = self.sound.as_ref() else {
            return Ok(());
        };

        let target = if self.config.clamp_seek && self.duration_ms > 0 {
            position_ms.min(self.duration_ms)
        } else {
            position_ms
        };

        debug!(requested_ms = position_ms, target_ms = target, "Seeking");
        let result = sound.set_position(target).await;
        self.check(result)
    }

    /// Release the sound and reset the session, queue included
    ///
    /// The full-screen flag is not touched.
    ///
    /// # Errors
    /// Never fails; unload errors are logged.
    pub async fn clear_playback(&mut self) -> Result<()> {
        self.release_sound().await;

        self.current_track = None;
        self.position_ms = 0;
        self.duration_ms = 0;
        self.set_state(PlaybackState::Empty);

        if !self.queue.is_empty() {
            self.queue.clear();
            self.emit(PlaybackEvent::QueueChanged {
                length: 0,
                cursor: None,
            });
        }

        self.publish();
        Ok(())
    }

    /// Set the full-screen presentation flag
    pub fn set_full_screen(&mut self, is_full_screen: bool) {
        if self.is_full_screen == is_full_screen {
            return;
        }
        self.is_full_screen = is_full_screen;
        self.emit(PlaybackEvent::FullScreenChanged { is_full_screen });
        self.publish();
    }

    /// Handle one forwarded status tick
    ///
    /// Ticks from superseded loads, or arriving after the sound was released,
    /// are dropped.
    ///
    /// # Errors
    /// Errors from the auto-advance load
    pub async fn on_status(&mut self, tick: StatusTick) -> Result<()> {
        if tick.generation != self.generation || self.sound.is_none() {
            trace!(
                tick_generation = tick.generation,
                current_generation = self.generation,
                "Dropping stale status tick"
            );
            return Ok(());
        }

        let status = tick.status;
        if !status.is_loaded {
            return Ok(());
        }

        self.position_ms = status.position_ms;
        self.duration_ms = status.duration_ms;
        self.emit(PlaybackEvent::PositionUpdate {
            position_ms: status.position_ms,
            duration_ms: status.duration_ms,
        });
        self.publish();

        if !status.did_just_finish {
            return Ok(());
        }

        if let Some(track) = &self.current_track {
            debug!(track_id = %track.id, "Track finished");
            let track_id = track.id.clone();
            self.emit(PlaybackEvent::TrackFinished { track_id });
        }

        match self.play_next_track().await {
            Err(PlaybackError::MissingPreview(track_id)) => {
                warn!(track_id = %track_id, "Next track has no preview, stopping");
                self.clear_playback().await
            }
            result => result,
        }
    }

    /// Release the sound before the owner goes away
    pub async fn shutdown(&mut self) {
        self.release_sound().await;
        self.current_track = None;
        self.set_state(PlaybackState::Empty);
        self.publish();
    }

    // ===== Internals =====

    async fn load_track(&mut self, track: Track, update: QueueUpdate) -> Result<()> {
        let url = track
            .preview_url()
            .map(str::to_owned)
            .ok_or_else(|| PlaybackError::MissingPreview(track.id.clone()))?;

        match update {
            QueueUpdate::Clear => {
                if !self.queue.is_empty() {
                    self.queue.clear();
                    self.emit(PlaybackEvent::QueueChanged {
                        length: 0,
                        cursor: None,
                    });
                }
            }
            QueueUpdate::Replace(tracks) => {
                self.queue.replace(tracks);
                self.emit(PlaybackEvent::QueueChanged {
                    length: self.queue.len(),
                    cursor: self.queue.cursor(),
                });
            }
            QueueUpdate::MoveTo(index) => {
                self.queue.set_cursor(index);
            }
        }

        self.release_sound().await;

        self.generation += 1;
        let generation = self.generation;
        let previous_track_id = self.current_track.take().map(|t| t.id);

        self.current_track = Some(track.clone());
        self.position_ms = 0;
        self.duration_ms = 0;
        self.set_state(PlaybackState::Loading);
        self.publish();

        debug!(track_id = %track.id, generation, url = %url, "Loading preview");

        match self.engine.load(&url).await {
            Ok(sound) => {
                self.forwarder = Some(spawn_forwarder(
                    generation,
                    sound.subscribe(),
                    self.feed_tx.clone(),
                ));
                self.sound = Some(sound);

                info!(track_id = %track.id, title = %track.title, "Playing track");
                self.emit(PlaybackEvent::TrackChanged {
                    track_id: track.id,
                    previous_track_id,
                });
                self.set_state(PlaybackState::Playing);
                self.publish();
                Ok(())
            }
            Err(err) => {
                warn!(track_id = %track.id, error = %err, "Failed to load preview");
                self.current_track = None;
                self.set_state(PlaybackState::Empty);
                if !self.queue.is_empty() {
                    self.queue.clear();
                    self.emit(PlaybackEvent::QueueChanged {
                        length: 0,
                        cursor: None,
                    });
                }
                self.emit(PlaybackEvent::Error {
                    message: err.to_string(),
                });
                self.publish();
                Err(err)
            }
        }
    }

    async fn release_sound(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
        if let Some(sound) = self.sound.take() {
            if let Err(err) = sound.unload().await {
                warn!(error = %err, "Failed to unload sound");
            }
        }
    }

    /// Report an engine failure on the event channel and pass it on
    fn check(&self, result: Result<()>) -> Result<()> {
        if let Err(err) = &result {
            warn!(error = %err, "Engine command failed");
            self.emit(PlaybackEvent::Error {
                message: err.to_string(),
            });
        }
        result
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine
        let _ = self.events_tx.send(event);
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

impl Drop for PlaybackManager {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

fn spawn_forwarder(
    generation: u64,
    mut stream: StatusStream,
    feed: mpsc::UnboundedSender<StatusTick>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(status) = stream.recv().await {
            if feed.send(StatusTick { generation, status }).is_err() {
                break;
            }
        }
    })
}
