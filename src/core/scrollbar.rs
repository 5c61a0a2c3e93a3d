use serde::{Deserialize, Serialize};

use crate::core::DateWindow;
use crate::error::{ChartError, ChartResult};

/// Smallest thumb width, as a fraction of the track, so it stays grabbable.
pub const DEFAULT_MIN_THUMB_FRACTION: f64 = 0.05;
pub const DEFAULT_TRACK_HEIGHT_PX: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollbarConfig {
    pub min_thumb_fraction: f64,
    pub track_height_px: f64,
}

impl Default for ScrollbarConfig {
    fn default() -> Self {
        Self {
            min_thumb_fraction: DEFAULT_MIN_THUMB_FRACTION,
            track_height_px: DEFAULT_TRACK_HEIGHT_PX,
        }
    }
}

impl ScrollbarConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.min_thumb_fraction.is_finite()
            || self.min_thumb_fraction <= 0.0
            || self.min_thumb_fraction > 1.0
        {
            return Err(ChartError::InvalidData(
                "scrollbar min thumb fraction must be finite and in (0, 1]".to_owned(),
            ));
        }
        if !self.track_height_px.is_finite() || self.track_height_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "scrollbar track height must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Thumb width as a fraction of the track.
#[must_use]
pub fn thumb_fraction(visible_count: usize, total: usize, min_fraction: f64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (visible_count as f64 / total as f64)
        .max(min_fraction)
        .min(1.0)
}

/// Maps a thumb position in `[0, 100]` to the window start it represents.
#[must_use]
pub fn percentage_to_start_index(percentage: f64, visible_count: usize, total: usize) -> usize {
    let max_start = total.saturating_sub(visible_count);
    let percentage = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    (percentage / 100.0 * max_start as f64).round() as usize
}

/// Inverse of [`percentage_to_start_index`], used to reposition the thumb
/// after the window moved for another reason.
#[must_use]
pub fn start_index_to_percentage(start_index: usize, visible_count: usize, total: usize) -> f64 {
    let max_start = total.saturating_sub(visible_count);
    if max_start == 0 {
        return 0.0;
    }
    start_index.min(max_start) as f64 / max_start as f64 * 100.0
}

/// Resolved thumb placement in track pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThumbGeometry {
    pub track_width_px: f64,
    pub offset_px: f64,
    pub width_px: f64,
}

impl ThumbGeometry {
    #[must_use]
    pub fn travel_px(self) -> f64 {
        (self.track_width_px - self.width_px).max(0.0)
    }

    #[must_use]
    pub fn percentage(self) -> f64 {
        offset_to_percentage(self.offset_px, self.travel_px())
    }

    #[must_use]
    pub fn contains(self, pointer_x: f64) -> bool {
        pointer_x >= self.offset_px && pointer_x <= self.offset_px + self.width_px
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ThumbDrag {
    origin_pointer_x: f64,
    origin_offset_px: f64,
    travel_px: f64,
}

/// Keeps a horizontal scrollbar and the date window in agreement.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollbarSync {
    config: ScrollbarConfig,
    track_width_px: f64,
    drag: Option<ThumbDrag>,
}

impl ScrollbarSync {
    pub fn new(config: ScrollbarConfig, track_width_px: f64) -> ChartResult<Self> {
        let config = config.validate()?;
        validate_track_width(track_width_px)?;
        Ok(Self {
            config,
            track_width_px,
            drag: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> ScrollbarConfig {
        self.config
    }

    #[must_use]
    pub fn track_width_px(&self) -> f64 {
        self.track_width_px
    }

    /// Resizes the track. An in-flight drag is cancelled.
    pub fn set_track_width(&mut self, track_width_px: f64) -> ChartResult<()> {
        validate_track_width(track_width_px)?;
        self.track_width_px = track_width_px;
        self.drag = None;
        Ok(())
    }

    #[must_use]
    pub fn thumb_geometry(&self, window: DateWindow, total: usize) -> ThumbGeometry {
        let fraction = thumb_fraction(window.visible_count, total, self.config.min_thumb_fraction);
        let width_px = fraction * self.track_width_px;
        let travel_px = (self.track_width_px - width_px).max(0.0);
        let percentage = start_index_to_percentage(window.start_index, window.visible_count, total);
        ThumbGeometry {
            track_width_px: self.track_width_px,
            offset_px: percentage / 100.0 * travel_px,
            width_px,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Captures the pointer origin and the current thumb offset.
    pub fn begin_drag(
        &mut self,
        pointer_x: f64,
        window: DateWindow,
        total: usize,
    ) -> ChartResult<()> {
        validate_pointer(pointer_x)?;
        let thumb = self.thumb_geometry(window, total);
        self.drag = Some(ThumbDrag {
            origin_pointer_x: pointer_x,
            origin_offset_px: thumb.offset_px,
            travel_px: thumb.travel_px(),
        });
        Ok(())
    }

    /// Returns the thumb percentage for the new pointer position, or `None`
    /// when no drag is in progress.
    pub fn drag_move(&self, pointer_x: f64) -> ChartResult<Option<f64>> {
        validate_pointer(pointer_x)?;
        let Some(drag) = self.drag else {
            return Ok(None);
        };
        let offset = (drag.origin_offset_px + (pointer_x - drag.origin_pointer_x))
            .clamp(0.0, drag.travel_px);
        Ok(Some(offset_to_percentage(offset, drag.travel_px)))
    }

    /// Returns whether a drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Jumps the thumb so it is centred on the clicked track position.
    pub fn click_track(
        &self,
        pointer_x: f64,
        window: DateWindow,
        total: usize,
    ) -> ChartResult<f64> {
        validate_pointer(pointer_x)?;
        let thumb = self.thumb_geometry(window, total);
        let travel = thumb.travel_px();
        let offset = (pointer_x - thumb.width_px / 2.0).clamp(0.0, travel);
        Ok(offset_to_percentage(offset, travel))
    }
}

fn offset_to_percentage(offset_px: f64, travel_px: f64) -> f64 {
    if travel_px <= 0.0 {
        return 0.0;
    }
    (offset_px / travel_px * 100.0).clamp(0.0, 100.0)
}

fn validate_track_width(track_width_px: f64) -> ChartResult<()> {
    if !track_width_px.is_finite() || track_width_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "scrollbar track width must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

fn validate_pointer(pointer_x: f64) -> ChartResult<()> {
    if !pointer_x.is_finite() {
        return Err(ChartError::InvalidData(
            "scrollbar pointer position must be finite".to_owned(),
        ));
    }
    Ok(())
}
