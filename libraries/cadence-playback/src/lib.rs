//! Cadence Playback
//!
//! Keeps the transport controls in step with an audio engine that reports
//! its state asynchronously.
//!
//! # Architecture
//!
//! Three sources move the displayed position: the user dragging the seek bar,
//! periodic progress pushes, and one-shot notifications (seek completed,
//! track changed, playback ended). They meet in three parts:
//! - **[`SessionStore`]**: the merged session, written by patch
//! - **[`EventIngestor`]**: folds engine events in, withholding positions
//!   while a drag is active
//! - **[`CommandDispatcher`]**: turns intents into engine commands with an
//!   explicit [`Reconciliation`] per action
//!
//! [`PlayerControls`] owns all three on a single task and is the only writer.
//!
//! # Example
//!
//! ```rust
//! use cadence_playback::{DragState, EventIngestor, SessionStore};
//! use cadence_core::{EngineEvent, Progress};
//!
//! let mut store = SessionStore::default();
//! let mut drag = DragState::new();
//! let mut ingestor = EventIngestor::new();
//!
//! drag.begin(0.0);
//! drag.move_to(90.0);
//! ingestor.ingest(
//!     &EngineEvent::ProgressUpdate(Progress::new(42.0, 180.0)),
//!     &mut store,
//!     &mut drag,
//! );
//! assert_eq!(store.current_state().duration, 180.0);
//! assert_ne!(store.current_state().position, 42.0);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod drag;
pub mod error;
pub mod ingestor;
pub mod playlist;
pub mod session;
pub mod view;
pub mod volume;

pub use config::ControlsConfig;
pub use controller::{Activity, PlayerControls, UserIntent};
pub use dispatcher::{
    Action, CommandDispatcher, CommandTicket, DispatchState, EngineCommand, EngineReply,
    PendingCommand, Reconciliation, Resolution,
};
pub use drag::DragState;
pub use error::{ControlsError, Result};
pub use ingestor::{EventIngestor, Ingested};
pub use playlist::PlaylistView;
pub use session::{PlaybackSession, SessionPatch, SessionStore};
pub use view::{slider_max, PlayIcon, Tab, TransportView};
pub use volume::VolumeLevel;
