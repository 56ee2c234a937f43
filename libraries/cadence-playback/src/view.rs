//! View models for the transport bar and tabs
//!
//! Pure functions of the session; nothing here writes state.

use cadence_core::format_time;

use crate::config::ControlsConfig;
use crate::drag::DragState;
use crate::session::PlaybackSession;

/// Seek slider range: the duration, or `fallback` while it is unknown
pub fn slider_max(duration: f64, fallback: f64) -> f64 {
    if duration > 0.0 {
        duration
    } else {
        fallback
    }
}

/// Icon on the play button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayIcon {
    Play,
    Pause,
}

/// Everything the transport bar renders
#[derive(Debug, Clone, PartialEq)]
pub struct TransportView {
    pub title: String,
    pub artist: String,
    pub elapsed: String,
    pub total: String,
    pub slider_value: f64,
    pub slider_max: f64,
    pub slider_step: f64,
    pub play_icon: PlayIcon,
    pub volume: u8,
    pub dragging: bool,
}

impl TransportView {
    pub const NO_TRACK_TITLE: &'static str = "Nothing playing";

    pub fn new(session: &PlaybackSession, drag: &DragState, config: &ControlsConfig) -> Self {
        let slider_value = if drag.is_active() {
            drag.pending_position()
        } else {
            session.position
        };
        let (title, artist) = match &session.current_track {
            Some(track) => (track.title.clone(), track.artist.clone()),
            None => (Self::NO_TRACK_TITLE.to_string(), String::new()),
        };

        Self {
            title,
            artist,
            elapsed: format_time(session.position),
            total: format_time(session.duration),
            slider_value,
            slider_max: slider_max(session.duration, config.fallback_slider_max),
            slider_step: config.slider_step,
            play_icon: if session.is_playing {
                PlayIcon::Pause
            } else {
                PlayIcon::Play
            },
            volume: session.volume,
            dragging: drag.is_active(),
        }
    }

    /// Slider fill in 0.0-1.0
    pub fn ratio(&self) -> f64 {
        if self.slider_max <= 0.0 {
            return 0.0;
        }
        (self.slider_value / self.slider_max).clamp(0.0, 1.0)
    }
}

/// Side panel tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Playlist,
    Lyrics,
    Bio,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Playlist, Tab::Lyrics, Tab::Bio];

    pub fn title(self) -> &'static str {
        match self {
            Self::Playlist => "Playlist",
            Self::Lyrics => "Lyrics",
            Self::Bio => "Bio",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Playlist => 0,
            Self::Lyrics => 1,
            Self::Bio => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
