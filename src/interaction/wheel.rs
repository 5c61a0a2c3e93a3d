use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Discrete wheel tuning: every notch is one step regardless of its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelBehavior {
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub pan_step_ratio: f64,
    pub min_visible_count: usize,
}

impl Default for WheelBehavior {
    fn default() -> Self {
        Self {
            zoom_in_factor: 0.9,
            zoom_out_factor: 1.1,
            pan_step_ratio: 0.1,
            min_visible_count: 2,
        }
    }
}

impl WheelBehavior {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.zoom_in_factor.is_finite()
            || self.zoom_in_factor <= 0.0
            || self.zoom_in_factor >= 1.0
        {
            return Err(ChartError::InvalidData(
                "wheel zoom-in factor must be finite and in (0, 1)".to_owned(),
            ));
        }
        if !self.zoom_out_factor.is_finite() || self.zoom_out_factor <= 1.0 {
            return Err(ChartError::InvalidData(
                "wheel zoom-out factor must be finite and > 1".to_owned(),
            ));
        }
        if !self.pan_step_ratio.is_finite() || self.pan_step_ratio <= 0.0 {
            return Err(ChartError::InvalidData(
                "wheel pan step ratio must be finite and > 0".to_owned(),
            ));
        }
        if self.min_visible_count == 0 {
            return Err(ChartError::InvalidData(
                "wheel min visible count must be >= 1".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// One wheel event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    pub delta_y: f64,
    /// Shift (or the host's chosen modifier) held: pan instead of zoom.
    pub pan_modifier: bool,
}

impl WheelInput {
    #[must_use]
    pub fn zoom(delta_y: f64) -> Self {
        Self {
            delta_y,
            pan_modifier: false,
        }
    }

    #[must_use]
    pub fn pan(delta_y: f64) -> Self {
        Self {
            delta_y,
            pan_modifier: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WheelGesture {
    Zoom { factor: f64 },
    Pan { delta_fraction: f64 },
}

/// Maps a wheel event to a zoom or pan step.
///
/// Positive `delta_y` (wheel down) zooms out or pans forward in time.
pub fn resolve_wheel_gesture(
    input: WheelInput,
    behavior: WheelBehavior,
) -> ChartResult<Option<WheelGesture>> {
    if !input.delta_y.is_finite() {
        return Err(ChartError::InvalidData(
            "wheel delta must be finite".to_owned(),
        ));
    }
    if input.delta_y == 0.0 {
        return Ok(None);
    }

    let forward = input.delta_y > 0.0;
    let gesture = if input.pan_modifier {
        let delta_fraction = if forward {
            behavior.pan_step_ratio
        } else {
            -behavior.pan_step_ratio
        };
        WheelGesture::Pan { delta_fraction }
    } else {
        let factor = if forward {
            behavior.zoom_out_factor
        } else {
            behavior.zoom_in_factor
        };
        WheelGesture::Zoom { factor }
    };
    Ok(Some(gesture))
}
