//! Clock-driven stand-in engine
//!
//! Plays nothing. A virtual playhead advances on every tick and the engine
//! pushes the same notifications a real one would, so the shell can run
//! without an audio backend.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use cadence_core::{
    AudioEngine, EngineError, EngineEvent, EngineSnapshot, EventChannel, EventHub, EventSink,
    EventSource, Progress, Result, Subscription, TrackId, TrackRecord,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::EngineSettings;

#[derive(Debug, Default)]
struct Playhead {
    track: Option<TrackRecord>,
    position: f64,
    playing: bool,
    seeking: bool,
    volume: u8,
}

/// Virtual engine backed by a timer
#[derive(Debug)]
pub struct ClockEngine {
    hub: EventHub,
    playlist: Vec<TrackRecord>,
    playhead: Mutex<Playhead>,
    tick: Duration,
    seek_settle: Duration,
}

impl ClockEngine {
    pub fn new(playlist: Vec<TrackRecord>, settings: &EngineSettings) -> Self {
        Self {
            hub: EventHub::new(),
            playlist,
            playhead: Mutex::new(Playhead {
                volume: 100,
                ..Playhead::default()
            }),
            tick: settings.tick(),
            seek_settle: settings.seek_settle(),
        }
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Spawn the tick loop; abort the handle to stop it
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(engine.tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            interval.tick().await;
            loop {
                interval.tick().await;
                engine.advance(engine.tick.as_secs_f64());
            }
        })
    }

    /// Move the playhead forward by `elapsed` seconds and push progress
    ///
    /// Nothing happens while paused or while a seek is settling. Reaching the
    /// end pushes a final progress update, then `sound_done`, and rewinds.
    pub fn advance(&self, elapsed: f64) {
        let events = {
            let mut playhead = self.lock();
            if !playhead.playing || playhead.seeking {
                return;
            }
            let Some(duration) = playhead.track.as_ref().map(|track| track.duration_seconds) else {
                return;
            };

            playhead.position = (playhead.position + elapsed).min(duration);
            let progress = EngineEvent::ProgressUpdate(Progress::new(playhead.position, duration));
            if playhead.position < duration {
                vec![progress]
            } else {
                playhead.playing = false;
                playhead.position = 0.0;
                vec![progress, EngineEvent::SoundDone]
            }
        };

        for event in events {
            self.hub.emit(event);
        }
    }

    /// Current playhead position in seconds
    pub fn position(&self) -> f64 {
        self.lock().position
    }

    pub fn volume(&self) -> u8 {
        self.lock().volume
    }

    pub fn is_playing(&self) -> bool {
        self.lock().playing
    }

    fn lock(&self) -> MutexGuard<'_, Playhead> {
        self.playhead.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AudioEngine for ClockEngine {
    async fn play(&self) -> Result<()> {
        let mut playhead = self.lock();
        if playhead.track.is_none() {
            return Err(EngineError::rejected("nothing loaded"));
        }
        playhead.playing = true;
        debug!("Clock playing at {:.2}s", playhead.position);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let mut playhead = self.lock();
        if playhead.playing {
            playhead.playing = false;
            debug!("Clock paused at {:.2}s", playhead.position);
        }
        Ok(())
    }

    async fn set_volume(&self, volume: u8) -> Result<()> {
        self.lock().volume = volume.min(100);
        Ok(())
    }

    async fn seek(&self, position: f64) -> Result<()> {
        let (loaded, target, duration) = {
            let mut playhead = self.lock();
            let Some((loaded, duration)) = playhead
                .track
                .as_ref()
                .map(|track| (track.id, track.duration_seconds))
            else {
                return Err(EngineError::rejected("nothing loaded"));
            };
            let target = position.clamp(0.0, duration);
            playhead.position = target;
            playhead.seeking = true;
            (loaded, target, duration)
        };

        tokio::time::sleep(self.seek_settle).await;

        {
            let mut playhead = self.lock();
            if playhead.track.as_ref().map(|track| track.id) != Some(loaded) {
                debug!("Seek to {:.2}s dropped, track {} was replaced", target, loaded);
                return Ok(());
            }
            playhead.seeking = false;
        }
        self.hub
            .emit(EngineEvent::PositionChanged(Progress::new(target, duration)));
        debug!("Clock seeked to {:.2}s", target);
        Ok(())
    }

    async fn play_track(&self, file_path: String, track_id: TrackId) -> Result<()> {
        let track = self
            .playlist
            .iter()
            .find(|track| track.id == track_id)
            .cloned()
            .ok_or_else(|| {
                EngineError::rejected(format!("unknown track {track_id} ({file_path})"))
            })?;

        let now_playing = track.now_playing();
        {
            let mut playhead = self.lock();
            playhead.track = Some(track);
            playhead.position = 0.0;
            playhead.seeking = false;
            playhead.playing = true;
        }
        info!("Clock loaded {} - {}", now_playing.artist, now_playing.title);
        self.hub.emit(EngineEvent::TrackChanged(now_playing));
        Ok(())
    }

    async fn get_playback_state(&self) -> Result<EngineSnapshot> {
        let playhead = self.lock();
        Ok(EngineSnapshot {
            is_playing: playhead.playing,
            is_empty: playhead.track.is_none(),
        })
    }

    async fn get_playlist(&self) -> Result<Vec<TrackRecord>> {
        let loaded = self.lock().track.as_ref().map(|track| track.id);
        Ok(self
            .playlist
            .iter()
            .cloned()
            .map(|mut track| {
                track.current = Some(track.id) == loaded;
                track
            })
            .collect())
    }
}

impl EventSource for ClockEngine {
    fn listen(&self, channel: EventChannel, sink: EventSink) -> Result<Subscription> {
        self.hub.listen(channel, sink)
    }
}

const DEMO_ARTISTS: [&str; 4] = ["Netsky", "Kepler Drive", "Low Orbit", "Marrow"];
const DEMO_TITLES: [&str; 6] = [
    "Come Alive",
    "Nightfall",
    "Signal Fire",
    "Paper Moons",
    "Undertow",
    "Static Bloom",
];

/// Deterministic playlist for running the shell without a library
pub fn demo_playlist(count: usize) -> Vec<TrackRecord> {
    (0..count)
        .map(|index| {
            let id = index as u64 + 1;
            let artist = DEMO_ARTISTS[index % DEMO_ARTISTS.len()];
            let title = DEMO_TITLES[index % DEMO_TITLES.len()];
            let duration = 90.0 + ((index * 37) % 150) as f64;
            TrackRecord::new(
                TrackId::new(id),
                title,
                artist,
                format!("Demo Sessions {}", index / DEMO_TITLES.len() + 1),
                duration,
                format!("demo://track-{id}"),
            )
        })
        .collect()
}
