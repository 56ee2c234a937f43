//! Command dispatcher
//!
//! Turns user intents into engine commands and decides, per action, whether the
//! session changes before or after the engine answers:
//!
//! | Action        | Reconciliation     | On failure                     |
//! |---------------|--------------------|--------------------------------|
//! | play/pause    | confirm then apply | state untouched                |
//! | seek          | apply then confirm | target kept, drag cleared      |
//! | set volume    | apply then confirm | optimistic value kept, logged  |
//! | track select  | apply then confirm | optimistic mark kept, logged   |
//! | state query   | confirm then apply | assume not playing, logged     |
//! | playlist      | confirm then apply | empty playlist, logged         |
//!
//! Issuing a command hands back a [`PendingCommand`]; whoever runs it must
//! return its [`CommandTicket`] to [`CommandDispatcher::resolve`] with the
//! engine's answer.

use cadence_core::{AudioEngine, EngineError, EngineSnapshot, TrackId, TrackRecord};
use tracing::{debug, warn};

use crate::config::ControlsConfig;
use crate::drag::DragState;
use crate::error::{ControlsError, Result};
use crate::playlist::PlaylistView;
use crate::session::{SessionPatch, SessionStore};
use crate::view::slider_max;
use crate::volume::VolumeLevel;

/// Request sent to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Play,
    Pause,
    SetVolume(u8),
    Seek(f64),
    PlayTrack { file_path: String, track_id: TrackId },
    GetPlaybackState,
    GetPlaylist,
}

impl EngineCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::SetVolume(_) => "set_volume",
            Self::Seek(_) => "seek",
            Self::PlayTrack { .. } => "play_track",
            Self::GetPlaybackState => "get_playback_state",
            Self::GetPlaylist => "get_playlist",
        }
    }

    /// Send the command and wait for the engine's answer
    pub async fn execute(self, engine: &dyn AudioEngine) -> cadence_core::Result<EngineReply> {
        match self {
            Self::Play => engine.play().await.map(|()| EngineReply::Done),
            Self::Pause => engine.pause().await.map(|()| EngineReply::Done),
            Self::SetVolume(volume) => engine.set_volume(volume).await.map(|()| EngineReply::Done),
            Self::Seek(position) => engine.seek(position).await.map(|()| EngineReply::Done),
            Self::PlayTrack {
                file_path,
                track_id,
            } => engine
                .play_track(file_path, track_id)
                .await
                .map(|()| EngineReply::Done),
            Self::GetPlaybackState => engine.get_playback_state().await.map(EngineReply::Snapshot),
            Self::GetPlaylist => engine.get_playlist().await.map(EngineReply::Playlist),
        }
    }
}

/// Successful engine answer
#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    Done,
    Snapshot(EngineSnapshot),
    Playlist(Vec<TrackRecord>),
}

/// User-facing action a command belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PlayToggle,
    Seek,
    VolumeSet,
    TrackSelect,
    StateQuery,
    PlaylistFetch,
}

impl Action {
    /// When the session is written relative to the engine's answer
    pub fn reconciliation(self) -> Reconciliation {
        match self {
            Self::Seek | Self::VolumeSet | Self::TrackSelect => Reconciliation::ApplyThenConfirm,
            Self::PlayToggle | Self::StateQuery | Self::PlaylistFetch => {
                Reconciliation::ConfirmThenApply
            }
        }
    }
}

/// Ordering of the local write and the engine's confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Write only once the engine accepts the command
    ConfirmThenApply,
    /// Write immediately and let later events correct drift
    ApplyThenConfirm,
}

/// Per-action dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    AwaitingPlayToggle,
    AwaitingSeek,
    AwaitingVolumeSet,
    AwaitingTrackSelect,
    AwaitingQuery,
}

#[derive(Debug, Clone, PartialEq)]
enum Intent {
    PlayToggle { resume: bool },
    Seek { position: f64 },
    VolumeSet { volume: u8 },
    TrackSelect { track_id: TrackId },
    StateQuery,
    PlaylistFetch,
}

impl Intent {
    fn action(&self) -> Action {
        match self {
            Self::PlayToggle { .. } => Action::PlayToggle,
            Self::Seek { .. } => Action::Seek,
            Self::VolumeSet { .. } => Action::VolumeSet,
            Self::TrackSelect { .. } => Action::TrackSelect,
            Self::StateQuery => Action::StateQuery,
            Self::PlaylistFetch => Action::PlaylistFetch,
        }
    }
}

/// Claim on one in-flight command
///
/// Not `Clone`: each issued command resolves exactly once.
#[derive(Debug)]
pub struct CommandTicket {
    id: u64,
    intent: Intent,
}

impl CommandTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn action(&self) -> Action {
        self.intent.action()
    }
}

/// An issued command waiting to be sent
#[derive(Debug)]
pub struct PendingCommand {
    pub ticket: CommandTicket,
    pub command: EngineCommand,
}

/// Outcome of resolving a ticket
#[derive(Debug)]
pub enum Resolution {
    Confirmed(Action),
    Rejected { action: Action, error: EngineError },
}

impl Resolution {
    pub fn action(&self) -> Action {
        match self {
            Self::Confirmed(action) | Self::Rejected { action, .. } => *action,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Translates intents into engine commands
#[derive(Debug)]
pub struct CommandDispatcher {
    next_ticket: u64,
    in_flight: Vec<(u64, Action)>,
    fallback_slider_max: f64,
}

impl CommandDispatcher {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            next_ticket: 0,
            in_flight: Vec::new(),
            fallback_slider_max: config.fallback_slider_max,
        }
    }

    fn issue(&mut self, intent: Intent, command: EngineCommand) -> PendingCommand {
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight.push((id, intent.action()));
        debug!("Issuing {} (ticket {})", command.name(), id);
        PendingCommand {
            ticket: CommandTicket { id, intent },
            command,
        }
    }

    /// Whether any command of `action` is unresolved
    pub fn is_awaiting(&self, action: Action) -> bool {
        self.in_flight.iter().any(|(_, pending)| *pending == action)
    }

    pub fn state_of(&self, action: Action) -> DispatchState {
        if !self.is_awaiting(action) {
            return DispatchState::Idle;
        }
        match action {
            Action::PlayToggle => DispatchState::AwaitingPlayToggle,
            Action::Seek => DispatchState::AwaitingSeek,
            Action::VolumeSet => DispatchState::AwaitingVolumeSet,
            Action::TrackSelect => DispatchState::AwaitingTrackSelect,
            Action::StateQuery | Action::PlaylistFetch => DispatchState::AwaitingQuery,
        }
    }

    /// Number of unresolved commands
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Clamp a seek target to the slider range for `duration`
    pub fn clamp_position(&self, position: f64, duration: f64) -> f64 {
        position.clamp(0.0, slider_max(duration, self.fallback_slider_max))
    }

    /// One-time engine state query issued on mount
    pub fn query_playback_state(&mut self) -> PendingCommand {
        self.issue(Intent::StateQuery, EngineCommand::GetPlaybackState)
    }

    /// One-time playlist fetch issued on mount
    pub fn fetch_playlist(&mut self) -> PendingCommand {
        self.issue(Intent::PlaylistFetch, EngineCommand::GetPlaylist)
    }

    /// Pause if playing, otherwise play
    ///
    /// The session is not touched until the engine answers. Toggling again
    /// before then sends a second command; the last answer wins.
    pub fn toggle_playback(&mut self, store: &SessionStore) -> PendingCommand {
        if store.current_state().is_playing {
            self.issue(Intent::PlayToggle { resume: false }, EngineCommand::Pause)
        } else {
            self.issue(Intent::PlayToggle { resume: true }, EngineCommand::Play)
        }
    }

    /// Pointer down on the seek bar
    pub fn begin_drag(&self, store: &SessionStore, drag: &mut DragState) -> Result<()> {
        if self.is_awaiting(Action::Seek) || drag.is_committing() {
            return Err(ControlsError::SeekInFlight);
        }
        if !drag.is_scrubbing() {
            drag.begin(store.current_state().position);
        }
        Ok(())
    }

    /// Thumb moved; the displayed position follows it
    pub fn drag_move(&self, position: f64, store: &mut SessionStore, drag: &mut DragState) -> bool {
        if !position.is_finite() {
            return false;
        }
        let position = self.clamp_position(position, store.current_state().duration);
        if !drag.move_to(position) {
            return false;
        }
        store.apply(SessionPatch::new().position(position));
        true
    }

    /// Pointer released: show the target and seek to it
    pub fn commit_drag(
        &mut self,
        store: &mut SessionStore,
        drag: &mut DragState,
    ) -> Option<PendingCommand> {
        let position = drag.commit()?;
        store.apply(SessionPatch::new().position(position));
        Some(self.issue(Intent::Seek { position }, EngineCommand::Seek(position)))
    }

    /// Abandon the gesture without seeking
    ///
    /// The displayed position goes back to where the drag began.
    pub fn cancel_drag(&self, store: &mut SessionStore, drag: &mut DragState) -> bool {
        if !drag.is_scrubbing() {
            return false;
        }
        debug!(
            "Drag cancelled at {:.2}s, restoring {:.2}s",
            drag.pending_position(),
            drag.origin()
        );
        store.apply(SessionPatch::new().position(drag.origin()));
        drag.clear();
        true
    }

    /// Apply the new volume now and tell the engine
    pub fn set_volume(&mut self, volume: VolumeLevel, store: &mut SessionStore) -> PendingCommand {
        let volume = volume.get();
        store.apply(SessionPatch::new().volume(volume));
        self.issue(Intent::VolumeSet { volume }, EngineCommand::SetVolume(volume))
    }

    /// Mark the row current now and ask the engine to play it
    pub fn select_track(
        &mut self,
        track: &TrackRecord,
        playlist: &mut PlaylistView,
    ) -> PendingCommand {
        playlist.mark_current(track.id);
        self.issue(
            Intent::TrackSelect { track_id: track.id },
            EngineCommand::PlayTrack {
                file_path: track.file_path.clone(),
                track_id: track.id,
            },
        )
    }

    /// Apply the engine's answer to an issued command
    pub fn resolve(
        &mut self,
        ticket: CommandTicket,
        outcome: cadence_core::Result<EngineReply>,
        store: &mut SessionStore,
        drag: &mut DragState,
        playlist: &mut PlaylistView,
    ) -> Resolution {
        self.in_flight.retain(|(id, _)| *id != ticket.id);
        let action = ticket.intent.action();

        let outcome = match (ticket.intent, outcome) {
            (Intent::Seek { position }, outcome) => {
                drag.clear();
                outcome.map(|_| ()).map_err(|error| {
                    warn!("Seek to {:.2}s failed, keeping target: {}", position, error);
                    error
                })
            }
            (Intent::PlayToggle { resume }, Ok(_)) => {
                store.apply(SessionPatch::new().is_playing(resume));
                Ok(())
            }
            (Intent::PlayToggle { resume }, Err(error)) => {
                warn!("{} failed: {}", if resume { "Play" } else { "Pause" }, error);
                Err(error)
            }
            (Intent::VolumeSet { volume }, outcome) => outcome.map(|_| ()).map_err(|error| {
                warn!("Failed to set volume to {}: {}", volume, error);
                error
            }),
            (Intent::TrackSelect { track_id }, outcome) => outcome.map(|_| ()).map_err(|error| {
                warn!("Failed to play track {}: {}", track_id, error);
                error
            }),
            (Intent::StateQuery, Ok(EngineReply::Snapshot(snapshot))) => {
                debug!(
                    "Engine reports playing={} empty={}",
                    snapshot.is_playing, snapshot.is_empty
                );
                store.apply(SessionPatch::new().is_playing(snapshot.is_playing));
                Ok(())
            }
            (Intent::StateQuery, Err(error)) => {
                warn!("Failed to get playback state, assuming not playing: {}", error);
                Err(error)
            }
            (Intent::PlaylistFetch, Ok(EngineReply::Playlist(tracks))) => {
                debug!("Loaded playlist with {} tracks", tracks.len());
                playlist.replace(tracks);
                if let Some(track) = &store.current_state().current_track {
                    playlist.mark_current(track.id);
                }
                Ok(())
            }
            (Intent::PlaylistFetch, Err(error)) => {
                warn!("Failed to load playlist: {}", error);
                Err(error)
            }
            (intent, Ok(reply)) => {
                debug!("Ignoring unexpected reply {:?} for {:?}", reply, intent);
                Ok(())
            }
        };

        match outcome {
            Ok(()) => Resolution::Confirmed(action),
            Err(error) => Resolution::Rejected { action, error },
        }
    }
}
