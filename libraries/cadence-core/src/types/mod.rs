mod ids;
mod snapshot;
mod track;

pub use ids::TrackId;
pub use snapshot::EngineSnapshot;
pub use track::{format_time, NowPlaying, TrackRecord};
