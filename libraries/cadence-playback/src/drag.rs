//! Seek-bar drag lifecycle
//!
//! ```text
//! Idle --begin--> Scrubbing --commit--> Committing --clear--> Idle
//!                     |
//!                     +--cancel/clear--> Idle
//! ```
//!
//! While the drag is active (scrubbing or committing) engine progress pushes
//! must not move the displayed position.

/// Drag state for the seek bar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    active: bool,
    committing: bool,
    origin: f64,
    pending_position: f64,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start scrubbing from `position`
    pub fn begin(&mut self, position: f64) {
        self.active = true;
        self.committing = false;
        self.origin = position;
        self.pending_position = position;
    }

    /// Whether progress pushes are currently withheld
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the user is still moving the thumb
    pub fn is_scrubbing(&self) -> bool {
        self.active && !self.committing
    }

    /// Whether the released drag is waiting on its seek
    pub fn is_committing(&self) -> bool {
        self.active && self.committing
    }

    /// Displayed position when the drag began
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Where the thumb was last moved to
    pub fn pending_position(&self) -> f64 {
        self.pending_position
    }

    /// Move the thumb; ignored unless scrubbing
    pub fn move_to(&mut self, position: f64) -> bool {
        if !self.is_scrubbing() {
            return false;
        }
        self.pending_position = position;
        true
    }

    /// Release the thumb, returning the position to seek to
    pub fn commit(&mut self) -> Option<f64> {
        if !self.is_scrubbing() {
            return None;
        }
        self.committing = true;
        Some(self.pending_position)
    }

    /// Back to idle
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
