//! Position synchronization scenarios
//!
//! Drives the store, drag state, ingestor and dispatcher directly, resolving
//! commands by hand, so every interleaving is explicit.

use cadence_core::{EngineError, EngineEvent, NowPlaying, Progress, TrackId};
use cadence_playback::{
    Action, CommandDispatcher, ControlsConfig, DispatchState, DragState, EngineCommand,
    EngineReply, EventIngestor, PendingCommand, PlaylistView, Resolution, SessionPatch,
    SessionStore,
};

// ===== Helpers =====

struct Harness {
    store: SessionStore,
    drag: DragState,
    playlist: PlaylistView,
    ingestor: EventIngestor,
    dispatcher: CommandDispatcher,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: SessionStore::default(),
            drag: DragState::new(),
            playlist: PlaylistView::new(),
            ingestor: EventIngestor::new(),
            dispatcher: CommandDispatcher::new(&ControlsConfig::default()),
        }
    }

    fn progress(&mut self, position: f64, duration: f64) {
        self.event(EngineEvent::ProgressUpdate(Progress::new(position, duration)));
    }

    fn position_changed(&mut self, position: f64, duration: f64) {
        self.event(EngineEvent::PositionChanged(Progress::new(position, duration)));
    }

    fn event(&mut self, event: EngineEvent) {
        self.ingestor.ingest(&event, &mut self.store, &mut self.drag);
    }

    fn drag_to(&mut self, position: f64) {
        self.dispatcher
            .begin_drag(&self.store, &mut self.drag)
            .expect("drag should start");
        self.dispatcher
            .drag_move(position, &mut self.store, &mut self.drag);
    }

    fn commit(&mut self) -> PendingCommand {
        self.dispatcher
            .commit_drag(&mut self.store, &mut self.drag)
            .expect("drag should commit")
    }

    fn resolve(
        &mut self,
        pending: PendingCommand,
        outcome: cadence_core::Result<EngineReply>,
    ) -> Resolution {
        self.dispatcher.resolve(
            pending.ticket,
            outcome,
            &mut self.store,
            &mut self.drag,
            &mut self.playlist,
        )
    }

    fn position(&self) -> f64 {
        self.store.current_state().position
    }
}

// ===== Scenarios =====

#[test]
fn progress_while_idle_updates_position_and_playing() {
    let mut h = Harness::new();
    h.store.apply(SessionPatch::new().duration(180.0));

    h.progress(42.0, 180.0);

    let state = h.store.current_state();
    assert_eq!(state.position, 42.0);
    assert_eq!(state.duration, 180.0);
    assert!(state.is_playing);
}

#[test]
fn progress_during_drag_keeps_dragged_position() {
    let mut h = Harness::new();
    h.progress(10.0, 180.0);

    h.drag_to(90.0);
    assert_eq!(h.drag.pending_position(), 90.0);

    h.progress(42.0, 180.0);
    assert_eq!(h.position(), 90.0);
}

#[test]
fn confirmation_before_seek_resolves_clears_drag() {
    let mut h = Harness::new();
    h.progress(10.0, 180.0);
    h.drag_to(90.0);

    let seek = h.commit();
    assert_eq!(seek.command, EngineCommand::Seek(90.0));
    assert_eq!(h.dispatcher.state_of(Action::Seek), DispatchState::AwaitingSeek);

    h.position_changed(90.0, 180.0);
    assert_eq!(h.position(), 90.0);
    assert!(!h.drag.is_active());

    // The seek itself is still unresolved, so no second drag yet
    assert!(h.dispatcher.begin_drag(&h.store, &mut h.drag).is_err());

    let resolution = h.resolve(seek, Ok(EngineReply::Done));
    assert!(!resolution.is_rejected());
    assert_eq!(h.position(), 90.0);
    assert_eq!(h.dispatcher.state_of(Action::Seek), DispatchState::Idle);
}

#[test]
fn sound_done_stops_without_touching_position() {
    let mut h = Harness::new();
    h.progress(179.5, 180.0);

    h.event(EngineEvent::SoundDone);

    let state = h.store.current_state();
    assert!(!state.is_playing);
    assert_eq!(state.position, 179.5);
    assert_eq!(state.duration, 180.0);
}

#[test]
fn rejected_pause_leaves_playing() {
    let mut h = Harness::new();
    h.progress(30.0, 180.0);
    assert!(h.store.current_state().is_playing);

    let pause = h.dispatcher.toggle_playback(&h.store);
    assert_eq!(pause.command, EngineCommand::Pause);
    let resolution = h.resolve(pause, Err(EngineError::rejected("sink busy")));

    assert!(matches!(
        resolution,
        Resolution::Rejected {
            action: Action::PlayToggle,
            ..
        }
    ));
    assert!(h.store.current_state().is_playing);
}

// ===== Properties =====

#[test]
fn drag_suppression_still_updates_duration() {
    let mut h = Harness::new();
    h.progress(5.0, 100.0);
    h.drag_to(60.0);

    for (position, duration) in [(6.0, 100.0), (7.0, 120.0), (8.0, 120.0)] {
        h.progress(position, duration);
        assert_eq!(h.position(), h.drag.pending_position());
        assert_eq!(h.store.current_state().duration, duration);
    }
}

#[test]
fn confirmation_overrides_intermediate_progress() {
    let mut h = Harness::new();
    h.progress(10.0, 180.0);
    h.drag_to(120.0);
    let seek = h.commit();

    // Stale ticks from before the seek landed are withheld
    h.progress(11.0, 180.0);
    h.progress(12.0, 180.0);
    assert_eq!(h.position(), 120.0);

    h.position_changed(119.5, 180.0);
    assert_eq!(h.position(), 119.5);

    h.resolve(seek, Ok(EngineReply::Done));
    h.progress(119.6, 180.0);
    assert_eq!(h.position(), 119.6);
}

#[test]
fn duration_only_patch_leaves_everything_else() {
    let mut h = Harness::new();
    h.progress(50.0, 200.0);
    h.event(EngineEvent::TrackChanged(NowPlaying {
        id: TrackId::new(4),
        title: "Signal".to_string(),
        artist: "Orbit".to_string(),
        album: "Drift".to_string(),
    }));
    let before = h.store.current_state().clone();

    h.store.apply(SessionPatch::new().duration(321.0));

    let after = h.store.current_state();
    assert_eq!(after.position, before.position);
    assert_eq!(after.is_playing, before.is_playing);
    assert_eq!(after.current_track, before.current_track);
    assert_eq!(after.duration, 321.0);
}

#[test]
fn toggle_failure_never_flips() {
    let mut h = Harness::new();

    let play = h.dispatcher.toggle_playback(&h.store);
    assert_eq!(play.command, EngineCommand::Play);
    h.resolve(play, Err(EngineError::rejected("Sink is not empty")));
    assert!(!h.store.current_state().is_playing);
}

#[test]
fn zero_duration_confirmation_keeps_duration() {
    let mut h = Harness::new();
    h.progress(10.0, 240.0);

    h.position_changed(30.0, 0.0);

    assert_eq!(h.position(), 30.0);
    assert_eq!(h.store.current_state().duration, 240.0);
}

// ===== Edge cases =====

#[test]
fn engine_initiated_seek_is_treated_as_confirmation() {
    let mut h = Harness::new();
    h.progress(10.0, 180.0);

    h.position_changed(75.0, 180.0);

    assert_eq!(h.position(), 75.0);
    assert!(!h.drag.is_active());
}

#[test]
fn confirmation_during_scrub_ends_the_gesture() {
    let mut h = Harness::new();
    h.progress(10.0, 180.0);
    h.drag_to(50.0);

    h.position_changed(20.0, 180.0);
    assert_eq!(h.position(), 20.0);

    // The rest of the gesture is ignored
    assert!(!h.dispatcher.drag_move(80.0, &mut h.store, &mut h.drag));
    assert!(h.dispatcher.commit_drag(&mut h.store, &mut h.drag).is_none());
    assert_eq!(h.position(), 20.0);
}

#[test]
fn cancelled_drag_restores_position_from_before_the_gesture() {
    let mut h = Harness::new();
    h.progress(10.0, 180.0);
    h.drag_to(150.0);
    assert_eq!(h.position(), 150.0);

    assert!(h.dispatcher.cancel_drag(&mut h.store, &mut h.drag));
    assert!(h.dispatcher.is_idle());
    assert!(!h.drag.is_active());
    assert_eq!(h.position(), 10.0);

    h.progress(10.1, 180.0);
    assert_eq!(h.position(), 10.1);
}

#[test]
fn cancelled_drag_after_playback_ended_needs_no_push() {
    let mut h = Harness::new();
    h.progress(10.0, 180.0);
    h.event(EngineEvent::SoundDone);
    h.drag_to(150.0);

    assert!(h.dispatcher.cancel_drag(&mut h.store, &mut h.drag));

    let session = h.store.current_state();
    assert_eq!(session.position, 10.0);
    assert_eq!(session.duration, 180.0);
    assert!(!session.is_playing);
}

#[test]
fn double_toggle_sends_both_and_last_answer_wins() {
    let mut h = Harness::new();
    h.progress(10.0, 180.0);

    let first = h.dispatcher.toggle_playback(&h.store);
    let second = h.dispatcher.toggle_playback(&h.store);
    assert_eq!(first.command, EngineCommand::Pause);
    assert_eq!(second.command, EngineCommand::Pause);
    assert_eq!(h.dispatcher.in_flight(), 2);

    h.resolve(second, Ok(EngineReply::Done));
    h.resolve(first, Ok(EngineReply::Done));
    assert!(!h.store.current_state().is_playing);
    assert!(h.dispatcher.is_idle());
}

#[test]
fn track_changed_corrects_optimistic_select() {
    let mut h = Harness::new();
    let rows: Vec<_> = (1..=3)
        .map(|id| {
            cadence_core::TrackRecord::new(
                TrackId::new(id),
                format!("Track {id}"),
                "Artist",
                "Album",
                200.0,
                format!("/music/{id}.flac"),
            )
        })
        .collect();
    let fetch = h.dispatcher.fetch_playlist();
    h.resolve(fetch, Ok(EngineReply::Playlist(rows.clone())));
    assert_eq!(h.playlist.len(), 3);

    let select = h.dispatcher.select_track(&rows[0], &mut h.playlist);
    assert_eq!(h.playlist.current().map(|t| t.id), Some(TrackId::new(1)));

    // Engine ends up on a different track
    let actual = rows[2].now_playing();
    h.event(EngineEvent::TrackChanged(actual.clone()));
    h.playlist.mark_current(actual.id);
    h.resolve(select, Ok(EngineReply::Done));

    assert_eq!(h.store.current_state().current_track, Some(actual));
    assert_eq!(h.playlist.current().map(|t| t.id), Some(TrackId::new(3)));
}
