//! Ratatui UI loop.
//!
//! Keys:
//! - Space: play/pause
//! - Left/Right or [/]: seek back/forward
//! - +/-: volume up/down
//! - Up/Down (j/k), Home/End: move playlist cursor
//! - Enter: play the track under the cursor
//! - Tab/Shift-Tab: switch tab
//! - Esc: abandon a seek drag
//! - q: quit
//!
//! Mouse: press on the seek bar, drag, and release on the bar to seek.
//! Releasing anywhere else abandons the drag.

mod app;
mod render;

pub use app::{run, App, Flow};
pub use render::{draw, position_for_column};
