//! Volume level as chosen on the slider
//!
//! The session store takes volume as given, so every writer goes through
//! [`VolumeLevel`] to keep it inside 0-100.

/// Volume level (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VolumeLevel(u8);

impl VolumeLevel {
    pub const MAX: u8 = 100;

    /// Create a level, clamping to 0-100
    pub fn new(level: i32) -> Self {
        Self(level.clamp(0, i32::from(Self::MAX)) as u8)
    }

    /// Get current level
    pub fn get(self) -> u8 {
        self.0
    }

    /// Level raised by `step`, saturating at 100
    pub fn raised(self, step: u8) -> Self {
        Self::new(i32::from(self.0) + i32::from(step))
    }

    /// Level lowered by `step`, saturating at 0
    pub fn lowered(self, step: u8) -> Self {
        Self::new(i32::from(self.0) - i32::from(step))
    }
}

impl From<u8> for VolumeLevel {
    fn from(level: u8) -> Self {
        Self::new(i32::from(level))
    }
}

impl From<VolumeLevel> for u8 {
    fn from(level: VolumeLevel) -> Self {
        level.0
    }
}
