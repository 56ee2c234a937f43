//! Error types for the player controls

use cadence_core::{EngineError, TrackId};
use thiserror::Error;

/// Player controls errors
#[derive(Debug, Error)]
pub enum ControlsError {
    /// Engine command or subscription failed
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// A seek from the previous drag has not resolved yet
    #[error("A seek is already in flight")]
    SeekInFlight,

    /// Selected track is not in the playlist
    #[error("Track not in playlist: {0}")]
    UnknownTrack(TrackId),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for player controls operations
pub type Result<T> = std::result::Result<T, ControlsError>;
