/// Track records exchanged with the engine
use serde::{Deserialize, Serialize};

use super::TrackId;

/// One row of the engine-owned playlist
///
/// `current` is a presentation hint. The shell may set it before the engine
/// confirms the change, so it is never treated as authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Display form of the duration (`m:ss`)
    pub duration: String,
    pub duration_seconds: f64,
    pub file_path: String,
    #[serde(default)]
    pub current: bool,
}

impl TrackRecord {
    /// Create a record, deriving the display duration from `duration_seconds`
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        duration_seconds: f64,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            duration: format_time(duration_seconds),
            duration_seconds,
            file_path: file_path.into(),
            current: false,
        }
    }

    /// Identity of this record as reported in `track_changed`
    pub fn now_playing(&self) -> NowPlaying {
        NowPlaying {
            id: self.id,
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
        }
    }
}

/// The track the engine says is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// Format seconds as `m:ss`
///
/// Minutes are not padded and both parts are floored, so 191.9 renders as
/// `3:11`. Negative and non-finite input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
