//! Shared test fixtures: a scripted audio engine and track builders

#![allow(dead_code)]

use async_trait::async_trait;
use seedtune_core::Track;
use seedtune_playback::{AudioEngine, EngineStatus, PlaybackError, Result, Sound, StatusStream};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Engine call recorded by [`ScriptedEngine`], tagged with the sound index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Play(usize),
    Pause(usize),
    Seek(usize, u64),
    Unload(usize),
}

#[derive(Default)]
struct Script {
    loads: Vec<String>,
    calls: Vec<Call>,
    live_sounds: usize,
    max_live_sounds: usize,
    failing: HashSet<String>,
    senders: Vec<Vec<mpsc::UnboundedSender<EngineStatus>>>,
}

/// Engine that records every call and lets tests push status ticks
///
/// Unloaded sounds keep their senders, so tests can simulate late ticks from
/// a released resource.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    script: Arc<Mutex<Script>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(&self) -> Arc<dyn AudioEngine> {
        Arc::new(self.clone())
    }

    /// Make every load of `url` fail
    pub fn fail_on(&self, url: &str) {
        self.script.lock().unwrap().failing.insert(url.to_string());
    }

    /// URLs passed to `load`, successful or not
    pub fn loads(&self) -> Vec<String> {
        self.script.lock().unwrap().loads.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn live_sounds(&self) -> usize {
        self.script.lock().unwrap().live_sounds
    }

    pub fn max_live_sounds(&self) -> usize {
        self.script.lock().unwrap().max_live_sounds
    }

    /// Number of sounds created so far
    pub fn sound_count(&self) -> usize {
        self.script.lock().unwrap().senders.len()
    }

    /// Push a tick to every subscriber of sound `index`
    pub fn emit(&self, index: usize, status: EngineStatus) {
        let script = self.script.lock().unwrap();
        for tx in &script.senders[index] {
            let _ = tx.send(status);
        }
    }

    /// Push a tick to the most recently created sound
    pub fn emit_latest(&self, status: EngineStatus) {
        let index = self.sound_count() - 1;
        self.emit(index, status);
    }
}

#[async_trait]
impl AudioEngine for ScriptedEngine {
    async fn load(&self, url: &str) -> Result<Box<dyn Sound>> {
        let mut script = self.script.lock().unwrap();
        script.loads.push(url.to_string());

        if script.failing.contains(url) {
            return Err(PlaybackError::engine(format!("cannot load {url}")));
        }

        let index = script.senders.len();
        script.senders.push(Vec::new());
        script.live_sounds += 1;
        script.max_live_sounds = script.max_live_sounds.max(script.live_sounds);

        Ok(Box::new(ScriptedSound {
            index,
            script: Arc::clone(&self.script),
            unloaded: Mutex::new(false),
        }))
    }
}

struct ScriptedSound {
    index: usize,
    script: Arc<Mutex<Script>>,
    unloaded: Mutex<bool>,
}

impl ScriptedSound {
    fn record(&self, call: Call) {
        self.script.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Sound for ScriptedSound {
    async fn play(&self) -> Result<()> {
        self.record(Call::Play(self.index));
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record(Call::Pause(self.index));
        Ok(())
    }

    async fn set_position(&self, position_ms: u64) -> Result<()> {
        self.record(Call::Seek(self.index, position_ms));
        Ok(())
    }

    async fn unload(&self) -> Result<()> {
        let mut unloaded = self.unloaded.lock().unwrap();
        if !*unloaded {
            *unloaded = true;
            let mut script = self.script.lock().unwrap();
            script.live_sounds -= 1;
            script.calls.push(Call::Unload(self.index));
        }
        Ok(())
    }

    fn subscribe(&self) -> StatusStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.script.lock().unwrap().senders[self.index].push(tx);
        rx
    }
}

impl Drop for ScriptedSound {
    fn drop(&mut self) {
        // A sound dropped without unload still stops counting as live
        let unloaded = self.unloaded.get_mut().map(|u| *u).unwrap_or(true);
        if !unloaded {
            if let Ok(mut script) = self.script.lock() {
                script.live_sounds -= 1;
            }
        }
    }
}

// ===== Track Builders =====

pub fn preview_url(id: &str) -> String {
    format!("https://p.scdn.co/mp3-preview/{id}")
}

pub fn track(id: &str) -> Track {
    Track::new(id, format!("Track {id}"), 30_000).with_preview_url(preview_url(id))
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

pub fn track_without_preview(id: &str) -> Track {
    Track::new(id, format!("Track {id}"), 30_000)
}
