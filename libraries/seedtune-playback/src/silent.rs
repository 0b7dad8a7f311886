//! Clock-driven engine without audio output
//!
//! Emits the same status ticks a real preview player would, advancing a
//! virtual clock while "playing". Used by the command-line application and
//! by tests running on a paused tokio clock.

use crate::engine::{AudioEngine, EngineStatus, Sound, StatusStream};
use crate::error::{PlaybackError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

/// Silent engine settings
#[derive(Debug, Clone, Copy)]
pub struct SilentEngineConfig {
    /// Interval between status ticks (default: 250ms)
    pub tick_interval: Duration,

    /// Length of every clip in milliseconds (default: 30s, the preview length)
    pub clip_length_ms: u64,
}

impl Default for SilentEngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(250),
            clip_length_ms: 30_000,
        }
    }
}

/// Shortest tick interval; `tokio::time::interval` rejects zero
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Engine that plays nothing but keeps time
#[derive(Debug, Clone, Default)]
pub struct SilentEngine {
    config: SilentEngineConfig,
}

impl SilentEngine {
    /// Create a silent engine
    ///
    /// Tick intervals below one millisecond are raised to one millisecond.
    pub fn new(mut config: SilentEngineConfig) -> Self {
        config.tick_interval = config.tick_interval.max(MIN_TICK_INTERVAL);
        Self { config }
    }
}

#[async_trait]
impl AudioEngine for SilentEngine {
    async fn load(&self, url: &str) -> Result<Box<dyn Sound>> {
        let supported = ["http://", "https://", "file://"]
            .iter()
            .any(|scheme| url.starts_with(scheme));
        if !supported {
            return Err(PlaybackError::engine(format!("unsupported preview url: {url}")));
        }

        debug!(url = %url, "Silent engine loading clip");
        Ok(Box::new(SilentSound::start(self.config)))
    }
}

#[derive(Debug)]
struct Clock {
    position_ms: u64,
    length_ms: u64,
    playing: bool,
    loaded: bool,
    subscribers: Vec<mpsc::UnboundedSender<EngineStatus>>,
}

impl Clock {
    fn broadcast(&mut self, status: EngineStatus) {
        self.subscribers.retain(|tx| tx.send(status).is_ok());
    }
}

struct SilentSound {
    clock: Arc<Mutex<Clock>>,
    ticker: JoinHandle<()>,
}

impl SilentSound {
    fn start(config: SilentEngineConfig) -> Self {
        let clock = Arc::new(Mutex::new(Clock {
            position_ms: 0,
            length_ms: config.clip_length_ms,
            playing: true,
            loaded: true,
            subscribers: Vec::new(),
        }));

        let ticker = tokio::spawn(Self::tick_loop(Arc::clone(&clock), config.tick_interval));

        Self { clock, ticker }
    }

    async fn tick_loop(clock: Arc<Mutex<Clock>>, tick_interval: Duration) {
        let step_ms = tick_interval.as_millis() as u64;
        let mut ticker = tokio::time::interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Ok(mut clock) = clock.lock() else {
                break;
            };
            if !clock.loaded {
                break;
            }
            if !clock.playing {
                continue;
            }

            clock.position_ms = (clock.position_ms + step_ms).min(clock.length_ms);
            let finished = clock.position_ms >= clock.length_ms;
            let status = if finished {
                clock.playing = false;
                EngineStatus::finished(clock.length_ms)
            } else {
                EngineStatus::progress(clock.position_ms, clock.length_ms)
            };

            trace!(position_ms = status.position_ms, "Silent engine tick");
            clock.broadcast(status);

            if finished {
                break;
            }
        }
    }

    fn with_clock<T>(&self, f: impl FnOnce(&mut Clock) -> T) -> Result<T> {
        let mut clock = self
            .clock
            .lock()
            .map_err(|_| PlaybackError::engine("silent clock poisoned"))?;
        Ok(f(&mut clock))
    }
}

#[async_trait]
impl Sound for SilentSound {
    async fn play(&self) -> Result<()> {
        self.with_clock(|clock| {
            if clock.position_ms < clock.length_ms {
                clock.playing = true;
            }
        })
    }

    async fn pause(&self) -> Result<()> {
        self.with_clock(|clock| clock.playing = false)
    }

    async fn set_position(&self, position_ms: u64) -> Result<()> {
        self.with_clock(|clock| clock.position_ms = position_ms.min(clock.length_ms))
    }

    async fn unload(&self) -> Result<()> {
        self.ticker.abort();
        self.with_clock(|clock| {
            clock.loaded = false;
            clock.playing = false;
            clock.subscribers.clear();
        })
    }

    fn subscribe(&self) -> StatusStream {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut clock) = self.clock.lock() {
            clock.subscribers.push(tx);
        }
        rx
    }
}

impl Drop for SilentSound {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}
