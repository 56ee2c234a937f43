//! Player controls actor
//!
//! [`PlayerControls`] is the only writer of the session. It owns the store, the
//! drag state and the playlist view, and processes one thing at a time:
//! a user intent, an engine event, or a command completion. Engine commands run
//! on their own tasks and report back through a completion queue, so a slow
//! engine never blocks event ingestion and nothing in flight is cancelled when
//! the controls go away.

use std::sync::Arc;

use cadence_core::{
    event_queue, AudioEngine, EngineError, EngineEvent, EventSource, EventStream, SubscriptionSet,
    TrackId,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::config::ControlsConfig;
use crate::dispatcher::{CommandDispatcher, CommandTicket, EngineReply, PendingCommand, Resolution};
use crate::drag::DragState;
use crate::error::{ControlsError, Result};
use crate::ingestor::{EventIngestor, Ingested};
use crate::playlist::PlaylistView;
use crate::session::{PlaybackSession, SessionStore};
use crate::view::TransportView;
use crate::volume::VolumeLevel;

/// Something the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    TogglePlayback,
    DragStart,
    DragMove(f64),
    DragCommit,
    DragCancel,
    /// Requested volume, clamped to 0-100
    SetVolume(i32),
    SelectTrack(TrackId),
}

/// One unit of work processed by [`PlayerControls::next_activity`]
#[derive(Debug)]
pub enum Activity {
    Ingested(Ingested),
    Resolved(Resolution),
}

type Completion = (CommandTicket, cadence_core::Result<EngineReply>);

/// Carries a ticket back to the actor even if the command task dies
struct CompletionGuard {
    ticket: Option<CommandTicket>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl CompletionGuard {
    fn finish(mut self, outcome: cadence_core::Result<EngineReply>) {
        if let Some(ticket) = self.ticket.take() {
            let _ = self.completions.send((ticket, outcome));
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            let _ = self.completions.send((
                ticket,
                Err(EngineError::unavailable("command task ended without a reply")),
            ));
        }
    }
}

enum Next {
    Event(EngineEvent),
    Completed(Completion),
}

/// Mounted transport controls
///
/// Must be mounted inside a tokio runtime; engine commands are spawned onto it.
pub struct PlayerControls {
    engine: Arc<dyn AudioEngine>,
    config: ControlsConfig,
    store: SessionStore,
    drag: DragState,
    playlist: PlaylistView,
    ingestor: EventIngestor,
    dispatcher: CommandDispatcher,
    events: EventStream,
    completions: mpsc::UnboundedReceiver<Completion>,
    completion_sink: mpsc::UnboundedSender<Completion>,
    _subscriptions: SubscriptionSet,
}

impl PlayerControls {
    /// Subscribe to every engine channel, then query the engine state and
    /// playlist once
    ///
    /// Fails if the configuration is invalid or any channel cannot be
    /// attached; in that case no listener stays attached.
    pub fn mount(
        engine: Arc<dyn AudioEngine>,
        source: &dyn EventSource,
        config: ControlsConfig,
    ) -> Result<Self> {
        config.validate()?;

        let (sink, events) = event_queue();
        let subscriptions = SubscriptionSet::attach(source, &sink)?;
        let (completion_sink, completions) = mpsc::unbounded_channel();

        let mut controls = Self {
            engine,
            store: SessionStore::new(PlaybackSession::with_volume(config.initial_volume)),
            drag: DragState::new(),
            playlist: PlaylistView::new(),
            ingestor: EventIngestor::new(),
            dispatcher: CommandDispatcher::new(&config),
            config,
            events,
            completions,
            completion_sink,
            _subscriptions: subscriptions,
        };

        let query = controls.dispatcher.query_playback_state();
        controls.spawn(query);
        let fetch = controls.dispatcher.fetch_playlist();
        controls.spawn(fetch);

        info!("Player controls mounted");
        Ok(controls)
    }

    fn spawn(&self, pending: PendingCommand) {
        let PendingCommand { ticket, command } = pending;
        let engine = Arc::clone(&self.engine);
        let guard = CompletionGuard {
            ticket: Some(ticket),
            completions: self.completion_sink.clone(),
        };
        tokio::spawn(async move {
            let outcome = command.execute(engine.as_ref()).await;
            guard.finish(outcome);
        });
    }

    /// Apply a user intent
    ///
    /// Starting a drag while the previous seek is unresolved fails with
    /// [`ControlsError::SeekInFlight`]; selecting a track that is not in the
    /// playlist fails with [`ControlsError::UnknownTrack`].
    pub fn handle(&mut self, intent: UserIntent) -> Result<()> {
        debug!("User intent {:?}", intent);
        match intent {
            UserIntent::TogglePlayback => {
                let pending = self.dispatcher.toggle_playback(&self.store);
                self.spawn(pending);
            }
            UserIntent::DragStart => self.dispatcher.begin_drag(&self.store, &mut self.drag)?,
            UserIntent::DragMove(position) => {
                self.dispatcher
                    .drag_move(position, &mut self.store, &mut self.drag);
            }
            UserIntent::DragCommit => {
                let pending = self.dispatcher.commit_drag(&mut self.store, &mut self.drag);
                if let Some(pending) = pending {
                    self.spawn(pending);
                }
            }
            UserIntent::DragCancel => {
                self.dispatcher.cancel_drag(&mut self.store, &mut self.drag);
            }
            UserIntent::SetVolume(level) => {
                let pending = self
                    .dispatcher
                    .set_volume(VolumeLevel::new(level), &mut self.store);
                self.spawn(pending);
            }
            UserIntent::SelectTrack(id) => {
                let track = self
                    .playlist
                    .find(id)
                    .cloned()
                    .ok_or(ControlsError::UnknownTrack(id))?;
                let pending = self.dispatcher.select_track(&track, &mut self.playlist);
                self.spawn(pending);
            }
        }
        Ok(())
    }

    /// Seek relative to the displayed position as one complete gesture
    pub fn seek_by(&mut self, delta: f64) -> Result<()> {
        self.handle(UserIntent::DragStart)?;
        let target = self.drag.pending_position() + delta;
        self.handle(UserIntent::DragMove(target))?;
        self.handle(UserIntent::DragCommit)
    }

    /// Raise or lower the volume by the configured step
    pub fn step_volume(&mut self, raise: bool) -> Result<()> {
        let current = VolumeLevel::from(self.store.current_state().volume);
        let next = if raise {
            current.raised(self.config.volume_step)
        } else {
            current.lowered(self.config.volume_step)
        };
        self.handle(UserIntent::SetVolume(i32::from(next.get())))
    }

    /// Fold one engine event into the session
    pub fn ingest(&mut self, event: &EngineEvent) -> Ingested {
        debug!("Ingesting {}", event.channel());
        let ingested = self.ingestor.ingest(event, &mut self.store, &mut self.drag);
        if let Ingested::TrackChanged(id) = ingested {
            if !self.playlist.mark_current(id) {
                debug!("Track {} is not in the playlist", id);
            }
        }
        ingested
    }

    /// Wait for and process the next engine event or command completion
    ///
    /// Events already queued are processed before completions. Returns `None`
    /// once the event stream has closed and no command is in flight.
    pub async fn next_activity(&mut self) -> Option<Activity> {
        let awaiting = !self.dispatcher.is_idle();
        let next = tokio::select! {
            biased;
            Some(event) = self.events.recv() => Next::Event(event),
            Some(completion) = self.completions.recv(), if awaiting => Next::Completed(completion),
            else => return None,
        };

        Some(match next {
            Next::Event(event) => Activity::Ingested(self.ingest(&event)),
            Next::Completed((ticket, outcome)) => Activity::Resolved(self.resolve(ticket, outcome)),
        })
    }

    fn resolve(
        &mut self,
        ticket: CommandTicket,
        outcome: cadence_core::Result<EngineReply>,
    ) -> Resolution {
        self.dispatcher.resolve(
            ticket,
            outcome,
            &mut self.store,
            &mut self.drag,
            &mut self.playlist,
        )
    }

    /// Latest merged session
    pub fn session(&self) -> &PlaybackSession {
        self.store.current_state()
    }

    /// Session writes applied so far
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Observe session snapshots from elsewhere
    pub fn watch(&self) -> watch::Receiver<PlaybackSession> {
        self.store.subscribe()
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn playlist(&self) -> &PlaylistView {
        &self.playlist
    }

    /// Cursor movement only; marks are owned by the controls
    pub fn playlist_mut(&mut self) -> &mut PlaylistView {
        &mut self.playlist
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn transport(&self) -> TransportView {
        TransportView::new(self.store.current_state(), &self.drag, &self.config)
    }

    /// Detach every listener; commands still in flight run to completion
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for PlayerControls {
    fn drop(&mut self) {
        info!(
            "Player controls unmounted with {} commands in flight",
            self.dispatcher.in_flight()
        );
    }
}
