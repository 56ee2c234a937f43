//! Session state store
//!
//! Holds the single authoritative copy of what the controls display. Writes
//! arrive as [`SessionPatch`]es that overwrite only the fields they carry, and
//! every write is published to subscribers as a fresh snapshot.

use cadence_core::NowPlaying;
use tokio::sync::watch;

/// What the controls display
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub is_playing: bool,
    /// 0-100
    pub volume: u8,
    /// Seconds from the start of the track
    pub position: f64,
    /// Track length in seconds, 0 when unknown
    pub duration: f64,
    pub current_track: Option<NowPlaying>,
}

impl PlaybackSession {
    pub const DEFAULT_VOLUME: u8 = 70;

    /// Nothing playing, zero position and duration, the given volume
    pub fn with_volume(volume: u8) -> Self {
        Self {
            is_playing: false,
            volume,
            position: 0.0,
            duration: 0.0,
            current_track: None,
        }
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::with_volume(Self::DEFAULT_VOLUME)
    }
}

/// Partial update to a [`PlaybackSession`]
///
/// Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub is_playing: Option<bool>,
    pub volume: Option<u8>,
    pub position: Option<f64>,
    pub duration: Option<f64>,
    pub current_track: Option<NowPlaying>,
}

impl SessionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(mut self, is_playing: bool) -> Self {
        self.is_playing = Some(is_playing);
        self
    }

    pub fn volume(mut self, volume: u8) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn current_track(mut self, track: NowPlaying) -> Self {
        self.current_track = Some(track);
        self
    }

    /// Whether the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self.is_playing.is_none()
            && self.volume.is_none()
            && self.position.is_none()
            && self.duration.is_none()
            && self.current_track.is_none()
    }

    /// Overwrite the fields this patch carries
    pub fn merge_into(self, session: &mut PlaybackSession) {
        if let Some(is_playing) = self.is_playing {
            session.is_playing = is_playing;
        }
        if let Some(volume) = self.volume {
            session.volume = volume;
        }
        if let Some(position) = self.position {
            session.position = position;
        }
        if let Some(duration) = self.duration {
            session.duration = duration;
        }
        if let Some(track) = self.current_track {
            session.current_track = Some(track);
        }
    }
}

/// Single-writer owner of the [`PlaybackSession`]
///
/// Only the controls actor holds a `SessionStore`; everything else observes
/// through [`SessionStore::subscribe`].
#[derive(Debug)]
pub struct SessionStore {
    session: PlaybackSession,
    revision: u64,
    publisher: watch::Sender<PlaybackSession>,
}

impl SessionStore {
    pub fn new(initial: PlaybackSession) -> Self {
        let (publisher, _) = watch::channel(initial.clone());
        Self {
            session: initial,
            revision: 0,
            publisher,
        }
    }

    /// Latest merged state
    pub fn current_state(&self) -> &PlaybackSession {
        &self.session
    }

    /// Merge `patch` and publish the result
    ///
    /// Every call counts as a change, even an empty patch, so observers
    /// re-render at least once per write. Returns the new revision.
    pub fn apply(&mut self, patch: SessionPatch) -> u64 {
        patch.merge_into(&mut self.session);
        self.revision += 1;
        self.publisher.send_replace(self.session.clone());
        self.revision
    }

    /// Number of writes applied so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Observe every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSession> {
        self.publisher.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(PlaybackSession::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::TrackId;

    fn now_playing(id: u64) -> NowPlaying {
        NowPlaying {
            id: TrackId::new(id),
            title: format!("Track {id}"),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
        }
    }

    #[test]
    fn default_session() {
        let session = PlaybackSession::default();
        assert!(!session.is_playing);
        assert_eq!(session.volume, 70);
        assert_eq!(session.position, 0.0);
        assert_eq!(session.duration, 0.0);
        assert!(session.current_track.is_none());
    }

    #[test]
    fn patch_overwrites_only_present_fields() {
        let mut store = SessionStore::new(PlaybackSession::with_volume(40));
        store.apply(SessionPatch::new().position(12.5).duration(200.0));

        let state = store.current_state();
        assert_eq!(state.position, 12.5);
        assert_eq!(state.duration, 200.0);
        assert_eq!(state.volume, 40);
        assert!(!state.is_playing);
    }

    #[test]
    fn later_patch_wins_on_shared_field() {
        let mut store = SessionStore::default();
        store.apply(SessionPatch::new().position(10.0).is_playing(true));
        store.apply(SessionPatch::new().position(3.0));

        assert_eq!(store.current_state().position, 3.0);
        assert!(store.current_state().is_playing);
    }

    #[test]
    fn current_track_is_replaced_wholesale() {
        let mut store = SessionStore::default();
        store.apply(SessionPatch::new().current_track(now_playing(1)));
        store.apply(SessionPatch::new().current_track(now_playing(2)));

        assert_eq!(store.current_state().current_track, Some(now_playing(2)));
    }

    #[test]
    fn every_apply_bumps_revision_and_publishes() {
        let mut store = SessionStore::default();
        let mut observer = store.subscribe();
        assert_eq!(store.revision(), 0);

        assert_eq!(store.apply(SessionPatch::new()), 1);
        assert!(observer.has_changed().unwrap());
        observer.borrow_and_update();

        assert_eq!(store.apply(SessionPatch::new().volume(15)), 2);
        assert!(observer.has_changed().unwrap());
        assert_eq!(observer.borrow_and_update().volume, 15);
    }

    #[test]
    fn empty_patch_detection() {
        assert!(SessionPatch::new().is_empty());
        assert!(!SessionPatch::new().is_playing(false).is_empty());
    }
}
