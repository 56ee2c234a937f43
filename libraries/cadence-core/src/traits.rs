/// Core traits for the engine boundary
use crate::error::Result;
use crate::events::EventChannel;
use crate::subscription::{EventSink, Subscription};
use crate::types::{EngineSnapshot, TrackId, TrackRecord};
use async_trait::async_trait;

/// Request/response side of the audio engine
///
/// Every call may fail independently. Callers must not assume that commands
/// resolve in the order they were issued.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Start or resume playback
    async fn play(&self) -> Result<()>;

    /// Pause playback
    async fn pause(&self) -> Result<()>;

    /// Set output volume (0-100)
    async fn set_volume(&self, volume: u8) -> Result<()>;

    /// Move the playback position (seconds)
    async fn seek(&self, position: f64) -> Result<()>;

    /// Load and play a playlist entry
    async fn play_track(&self, file_path: String, track_id: TrackId) -> Result<()>;

    /// Query the current transport state
    async fn get_playback_state(&self) -> Result<EngineSnapshot>;

    /// Fetch the ordered playlist
    async fn get_playlist(&self) -> Result<Vec<TrackRecord>>;
}

/// Push side of the audio engine
pub trait EventSource: Send + Sync {
    /// Attach a listener for `channel` that forwards into `sink`
    ///
    /// The listener stays attached until the returned guard is dropped.
    fn listen(&self, channel: EventChannel, sink: EventSink) -> Result<Subscription>;
}
