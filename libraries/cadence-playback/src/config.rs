//! Player controls configuration

use serde::{Deserialize, Serialize};

use crate::error::{ControlsError, Result};

/// Tunables for the transport controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Volume shown before the user touches the slider (0-100, default: 70)
    pub initial_volume: u8,

    /// Volume change per key press (default: 5)
    pub volume_step: u8,

    /// Keyboard seek distance in seconds (default: 5.0)
    pub seek_step_seconds: f64,

    /// Seek slider range while the duration is unknown (default: 100.0)
    pub fallback_slider_max: f64,

    /// Seek slider resolution in seconds (default: 0.01)
    pub slider_step: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            initial_volume: 70,
            volume_step: 5,
            seek_step_seconds: 5.0,
            fallback_slider_max: 100.0,
            slider_step: 0.01,
        }
    }
}

impl ControlsConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.initial_volume > 100 {
            return Err(ControlsError::InvalidConfig(format!(
                "initial_volume must be 0-100, got {}",
                self.initial_volume
            )));
        }
        if self.volume_step == 0 || self.volume_step > 100 {
            return Err(ControlsError::InvalidConfig(format!(
                "volume_step must be 1-100, got {}",
                self.volume_step
            )));
        }
        if !(self.fallback_slider_max.is_finite() && self.fallback_slider_max > 0.0) {
            return Err(ControlsError::InvalidConfig(
                "fallback_slider_max must be a positive number".to_string(),
            ));
        }
        if !(self.slider_step.is_finite() && self.slider_step > 0.0) {
            return Err(ControlsError::InvalidConfig(
                "slider_step must be a positive number".to_string(),
            ));
        }
        if !(self.seek_step_seconds.is_finite() && self.seek_step_seconds > 0.0) {
            return Err(ControlsError::InvalidConfig(
                "seek_step_seconds must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}
