//! Playback session actor
//!
//! One tokio task owns the [`PlaybackManager`]. Commands from any number of
//! [`PlaybackHandle`]s and status ticks from the active sound are serialized
//! through a single `select!` loop, so session state is never shared.
//!
//! The session lives until [`PlaybackHandle::shutdown`] is called or every
//! handle is dropped; either way the sound is released before the task exits.

use crate::{
    engine::AudioEngine,
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    manager::{PlaybackManager, StatusFeed},
    types::{PlaybackConfig, SessionSnapshot},
};
use seedtune_core::Track;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, warn};

type Reply = oneshot::Sender<Result<()>>;

/// Commands accepted by the session task
#[derive(Debug)]
pub enum PlaybackCommand {
    /// Play one track, dropping the queue
    PlayTrack(Track, Reply),

    /// Replace the queue and play its first track
    PlayTrackList(Vec<Track>, Reply),

    /// Skip forward
    Next(Reply),

    /// Skip back
    Previous(Reply),

    /// Pause or resume
    TogglePlayPause(Reply),

    /// Seek to position (milliseconds)
    Seek(u64, Reply),

    /// Stop and drop the queue
    Clear(Reply),

    /// Set the full-screen flag
    SetFullScreen(bool, Reply),

    /// Release the sound and stop the task
    Shutdown(Reply),
}

/// Spawns the session task
pub struct PlaybackSession;

impl PlaybackSession {
    /// Start a session on the current tokio runtime
    pub fn spawn(engine: Arc<dyn AudioEngine>, config: PlaybackConfig) -> PlaybackHandle {
        let (command_tx, command_rx) = mpsc::channel(config.command_capacity.max(1));
        let (manager, feed) = PlaybackManager::new(engine, config);

        let handle = PlaybackHandle {
            commands: command_tx,
            snapshots: manager.snapshot_sender().subscribe(),
            events: manager.event_sender().clone(),
        };

        tokio::spawn(run(manager, feed, command_rx));
        handle
    }
}

async fn run(
    mut manager: PlaybackManager,
    mut feed: StatusFeed,
    mut commands: mpsc::Receiver<PlaybackCommand>,
) {
    debug!("Playback session started");

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("All playback handles dropped");
                    break;
                };
                if let ControlFlow::Stop = handle_command(&mut manager, command).await {
                    break;
                }
            }
            Some(tick) = feed.recv() => {
                if let Err(err) = manager.on_status(tick).await {
                    warn!(error = %err, "Auto-advance failed");
                }
            }
        }
    }

    manager.shutdown().await;
    debug!("Playback session stopped");
}

enum ControlFlow {
    Continue,
    Stop,
}

async fn handle_command(manager: &mut PlaybackManager, command: PlaybackCommand) -> ControlFlow {
    let (result, reply) = match command {
        PlaybackCommand::PlayTrack(track, reply) => (manager.play_track(track).await, reply),
        PlaybackCommand::PlayTrackList(tracks, reply) => {
            (manager.play_track_list(tracks).await, reply)
        }
        PlaybackCommand::Next(reply) => (manager.play_next_track().await, reply),
        PlaybackCommand::Previous(reply) => (manager.play_previous_track().await, reply),
        PlaybackCommand::TogglePlayPause(reply) => (manager.toggle_play_pause().await, reply),
        PlaybackCommand::Seek(position_ms, reply) => {
            (manager.seek_to_position(position_ms).await, reply)
        }
        PlaybackCommand::Clear(reply) => (manager.clear_playback().await, reply),
        PlaybackCommand::SetFullScreen(value, reply) => {
            manager.set_full_screen(value);
            (Ok(()), reply)
        }
        PlaybackCommand::Shutdown(reply) => {
            manager.shutdown().await;
            let _ = reply.send(Ok(()));
            return ControlFlow::Stop;
        }
    };

    // Caller may have given up waiting
    let _ = reply.send(result);
    ControlFlow::Continue
}

/// Cloneable handle to a running playback session
///
/// Inject this into whatever needs playback; there is no global session.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    commands: mpsc::Sender<PlaybackCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackHandle {
    async fn request(&self, command: impl FnOnce(Reply) -> PlaybackCommand) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| PlaybackError::SessionClosed)?;
        reply_rx.await.map_err(|_| PlaybackError::SessionClosed)?
    }

    /// Play a single track, dropping any queue
    ///
    /// # Errors
    /// `MissingPreview`, `Engine` or `SessionClosed`
    pub async fn play_track(&self, track: Track) -> Result<()> {
        self.request(|reply| PlaybackCommand::PlayTrack(track, reply))
            .await
    }

    /// Replace the queue and play its first track
    ///
    /// # Errors
    /// `QueueEmpty`, `MissingPreview`, `Engine` or `SessionClosed`
    pub async fn play_track_list(&self, tracks: Vec<Track>) -> Result<()> {
        self.request(|reply| PlaybackCommand::PlayTrackList(tracks, reply))
            .await
    }

    /// Skip to the next queued track, clearing playback at the end
    ///
    /// # Errors
    /// `MissingPreview`, `Engine` or `SessionClosed`
    pub async fn play_next_track(&self) -> Result<()> {
        self.request(PlaybackCommand::Next).await
    }

    /// Skip to the previous queued track
    ///
    /// # Errors
    /// `MissingPreview`, `Engine` or `SessionClosed`
    pub async fn play_previous_track(&self) -> Result<()> {
        self.request(PlaybackCommand::Previous).await
    }

    /// Pause or resume
    ///
    /// # Errors
    /// `Engine` or `SessionClosed`
    pub async fn toggle_play_pause(&self) -> Result<()> {
        self.request(PlaybackCommand::TogglePlayPause).await
    }

    /// Seek within the current track
    ///
    /// # Errors
    /// `Engine` or `SessionClosed`
    pub async fn seek_to_position(&self, position_ms: u64) -> Result<()> {
        self.request(|reply| PlaybackCommand::Seek(position_ms, reply))
            .await
    }

    /// Stop playback and drop the queue
    ///
    /// # Errors
    /// `SessionClosed`
    pub async fn clear_playback(&self) -> Result<()> {
        self.request(PlaybackCommand::Clear).await
    }

    /// Set the full-screen presentation flag
    ///
    /// # Errors
    /// `SessionClosed`
    pub async fn set_full_screen(&self, is_full_screen: bool) -> Result<()> {
        self.request(|reply| PlaybackCommand::SetFullScreen(is_full_screen, reply))
            .await
    }

    /// Stop the session task, releasing the sound
    ///
    /// Other handles get `SessionClosed` afterwards.
    ///
    /// # Errors
    /// `SessionClosed` if the task already stopped
    pub async fn shutdown(&self) -> Result<()> {
        self.request(PlaybackCommand::Shutdown).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to snapshots; dropping the receiver unsubscribes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Subscribe to playback events
    pub fn events(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Whether the session task is still running
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }
}
