//! Cadence Shell
//!
//! Terminal front-end for the Cadence player. Renders the playlist, tabs and
//! transport controls with ratatui and drives the [`cadence_playback`]
//! controls against the clock-based stand-in engine.

#![forbid(unsafe_code)]

pub mod clock_engine;
pub mod config;
pub mod error;
pub mod ui;

pub use clock_engine::{demo_playlist, ClockEngine};
pub use config::{EngineSettings, LogSettings, ShellConfig};
pub use error::{Result, ShellError};
