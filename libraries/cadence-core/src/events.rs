//! Engine push notifications
//!
//! The engine pushes on four named channels. Payload field names follow the
//! engine's wire format (`current_position`, `duration`) so a bridge that only
//! sees `(name, json)` pairs can hand them to [`EngineEvent::decode`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};
use crate::types::NowPlaying;

/// Named notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventChannel {
    /// Periodic position tick while the engine is playing
    ProgressUpdate,
    /// Authoritative position after a seek
    PositionChanged,
    /// The loaded track played to its end
    SoundDone,
    /// A different track is now loaded
    TrackChanged,
}

impl EventChannel {
    /// Every channel the shell listens on
    pub const ALL: [EventChannel; 4] = [
        EventChannel::ProgressUpdate,
        EventChannel::PositionChanged,
        EventChannel::SoundDone,
        EventChannel::TrackChanged,
    ];

    /// Wire name of the channel
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProgressUpdate => "progress_update",
            Self::PositionChanged => "position_changed",
            Self::SoundDone => "sound_done",
            Self::TrackChanged => "track_changed",
        }
    }
}

impl fmt::Display for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventChannel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| EngineError::UnknownChannel(s.to_string()))
    }
}

/// Position report carried by `progress_update` and `position_changed`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Seconds from the start of the track
    #[serde(rename = "current_position", alias = "position")]
    pub position: f64,
    /// Track length in seconds, 0 when unknown
    pub duration: f64,
}

impl Progress {
    pub const fn new(position: f64, duration: f64) -> Self {
        Self { position, duration }
    }
}

/// A push notification from the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ProgressUpdate(Progress),
    PositionChanged(Progress),
    SoundDone,
    TrackChanged(NowPlaying),
}

impl EngineEvent {
    /// Channel this event is delivered on
    pub fn channel(&self) -> EventChannel {
        match self {
            Self::ProgressUpdate(_) => EventChannel::ProgressUpdate,
            Self::PositionChanged(_) => EventChannel::PositionChanged,
            Self::SoundDone => EventChannel::SoundDone,
            Self::TrackChanged(_) => EventChannel::TrackChanged,
        }
    }

    /// Decode a raw notification received on `channel`
    ///
    /// `sound_done` carries no data, so its payload is ignored.
    pub fn decode(channel: EventChannel, payload: serde_json::Value) -> Result<Self> {
        let malformed = |source| EngineError::Payload { channel, source };
        match channel {
            EventChannel::ProgressUpdate => serde_json::from_value(payload)
                .map(Self::ProgressUpdate)
                .map_err(malformed),
            EventChannel::PositionChanged => serde_json::from_value(payload)
                .map(Self::PositionChanged)
                .map_err(malformed),
            EventChannel::SoundDone => Ok(Self::SoundDone),
            EventChannel::TrackChanged => serde_json::from_value(payload)
                .map(Self::TrackChanged)
                .map_err(malformed),
        }
    }

    /// Decode a notification addressed by its wire name
    pub fn decode_named(name: &str, payload: serde_json::Value) -> Result<Self> {
        Self::decode(name.parse()?, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackId;
    use serde_json::json;

    #[test]
    fn channel_names_round_trip() {
        for channel in EventChannel::ALL {
            assert_eq!(channel.as_str().parse::<EventChannel>().unwrap(), channel);
        }
        assert!(matches!(
            "volume_changed".parse::<EventChannel>(),
            Err(EngineError::UnknownChannel(_))
        ));
    }

    #[test]
    fn decode_progress_uses_engine_field_names() {
        let event = EngineEvent::decode_named(
            "progress_update",
            json!({ "current_position": 42.5, "duration": 180.0 }),
        )
        .unwrap();
        assert_eq!(event, EngineEvent::ProgressUpdate(Progress::new(42.5, 180.0)));
    }

    #[test]
    fn decode_position_changed_accepts_short_field_name() {
        let event = EngineEvent::decode_named(
            "position_changed",
            json!({ "position": 90.0, "duration": 0.0 }),
        )
        .unwrap();
        assert_eq!(event, EngineEvent::PositionChanged(Progress::new(90.0, 0.0)));
    }

    #[test]
    fn decode_sound_done_ignores_payload() {
        let event = EngineEvent::decode(EventChannel::SoundDone, serde_json::Value::Null).unwrap();
        assert_eq!(event, EngineEvent::SoundDone);
        assert_eq!(event.channel(), EventChannel::SoundDone);
    }

    #[test]
    fn decode_track_changed() {
        let event = EngineEvent::decode_named(
            "track_changed",
            json!({ "id": 3, "title": "Wanna Die For You", "artist": "Netsky", "album": "3" }),
        )
        .unwrap();
        match event {
            EngineEvent::TrackChanged(now) => assert_eq!(now.id, TrackId::new(3)),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn decode_reports_malformed_payload() {
        let err = EngineEvent::decode(EventChannel::ProgressUpdate, json!({ "duration": "long" }))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Payload {
                channel: EventChannel::ProgressUpdate,
                ..
            }
        ));
    }
}
