/// Engine state snapshot returned by `get_playback_state`
use serde::{Deserialize, Serialize};

/// Point-in-time engine transport state
///
/// The engine reports playing only when something is loaded and not paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub is_playing: bool,
    pub is_empty: bool,
}

impl EngineSnapshot {
    /// Snapshot of an engine with nothing loaded
    pub const fn empty() -> Self {
        Self {
            is_playing: false,
            is_empty: true,
        }
    }
}
