/// Engine boundary error types
use thiserror::Error;

use crate::events::EventChannel;

/// Result type alias using `EngineError`
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors crossing the boundary between the shell and the audio engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine received the command and refused it
    #[error("Command rejected: {0}")]
    Rejected(String),

    /// The engine could not be reached at all
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    /// A listener could not be attached to a notification channel
    #[error("Failed to subscribe to {channel}: {reason}")]
    Subscribe {
        channel: EventChannel,
        reason: String,
    },

    /// An event name that none of the notification channels carry
    #[error("Unknown event channel: {0}")]
    UnknownChannel(String),

    /// Event payload did not match the channel's shape
    #[error("Malformed {channel} payload: {source}")]
    Payload {
        channel: EventChannel,
        #[source]
        source: serde_json::Error,
    },
}

impl EngineError {
    /// Create a command rejection
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Create an engine-unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
