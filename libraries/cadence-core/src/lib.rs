//! Cadence Core
//!
//! Boundary types and traits shared by the Cadence player shell and any
//! audio engine it talks to.
//!
//! # Architecture
//!
//! The engine is an external collaborator. This crate describes it from the
//! shell's side only:
//! - **Commands**: the [`AudioEngine`] trait, one async method per request
//! - **Events**: [`EngineEvent`] on four named [`EventChannel`]s
//! - **Subscriptions**: [`EventSource`] hands out [`Subscription`] guards that
//!   detach on drop, and [`EventHub`] is a ready-made emitter for engines
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{event_queue, EngineEvent, EventHub, Progress, SubscriptionSet};
//!
//! let hub = EventHub::new();
//! let (sink, mut events) = event_queue();
//! let subscriptions = SubscriptionSet::attach(&hub, &sink).unwrap();
//!
//! hub.emit(EngineEvent::ProgressUpdate(Progress::new(42.0, 180.0)));
//! assert!(matches!(events.try_recv(), Ok(EngineEvent::ProgressUpdate(_))));
//!
//! subscriptions.teardown();
//! assert_eq!(hub.listener_count(), 0);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod events;
pub mod subscription;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use events::{EngineEvent, EventChannel, Progress};
pub use subscription::{
    event_queue, EventHub, EventSink, EventStream, Subscription, SubscriptionSet,
};
pub use traits::{AudioEngine, EventSource};
pub use types::{format_time, EngineSnapshot, NowPlaying, TrackId, TrackRecord};
