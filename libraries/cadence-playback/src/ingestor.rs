//! Event ingestor
//!
//! Folds engine push notifications into the session store. The drag check is
//! made per event against the live [`DragState`], never latched.

use cadence_core::{EngineEvent, Progress, TrackId};
use tracing::debug;

use crate::drag::DragState;
use crate::session::{SessionPatch, SessionStore};

/// What an ingested event did to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ingested {
    /// Progress applied; `withheld` when a drag kept the position out
    Progress { withheld: bool },
    /// Authoritative position applied and the drag cleared
    PositionConfirmed { position: f64 },
    /// Playback reached the end of the track
    PlaybackEnded,
    /// The engine reported a different loaded track
    TrackChanged(TrackId),
}

/// Drag-aware merge of engine events
#[derive(Debug, Default)]
pub struct EventIngestor {
    ingested: u64,
    withheld: u64,
}

impl EventIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into `store`
    pub fn ingest(
        &mut self,
        event: &EngineEvent,
        store: &mut SessionStore,
        drag: &mut DragState,
    ) -> Ingested {
        self.ingested += 1;
        match event {
            EngineEvent::ProgressUpdate(progress) => self.progress(*progress, store, drag),
            EngineEvent::PositionChanged(progress) => {
                let mut patch = SessionPatch::new().position(progress.position);
                if progress.duration > 0.0 {
                    patch = patch.duration(progress.duration);
                }
                store.apply(patch);
                drag.clear();
                debug!("Position confirmed at {:.2}s", progress.position);
                Ingested::PositionConfirmed {
                    position: progress.position,
                }
            }
            EngineEvent::SoundDone => {
                store.apply(SessionPatch::new().is_playing(false));
                debug!("Playback finished");
                Ingested::PlaybackEnded
            }
            EngineEvent::TrackChanged(track) => {
                let id = track.id;
                store.apply(SessionPatch::new().current_track(track.clone()));
                debug!("Track changed to {} ({})", track.title, id);
                Ingested::TrackChanged(id)
            }
        }
    }

    fn progress(
        &mut self,
        progress: Progress,
        store: &mut SessionStore,
        drag: &DragState,
    ) -> Ingested {
        if drag.is_active() {
            self.withheld += 1;
            store.apply(SessionPatch::new().duration(progress.duration));
            return Ingested::Progress { withheld: true };
        }

        // A progress tick is taken as evidence of playback. An engine that
        // pushes progress while paused would break this.
        store.apply(
            SessionPatch::new()
                .position(progress.position)
                .duration(progress.duration)
                .is_playing(true),
        );
        Ingested::Progress { withheld: false }
    }

    /// Events folded so far
    pub fn ingested(&self) -> u64 {
        self.ingested
    }

    /// Progress positions kept out by a drag
    pub fn withheld(&self) -> u64 {
        self.withheld
    }
}
