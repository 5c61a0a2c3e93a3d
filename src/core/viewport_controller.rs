use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::UniqueDateAxis;
use crate::error::{ChartError, ChartResult};

/// Number of axis dates shown when a dataset is first loaded.
pub const DEFAULT_VISIBLE_COUNT: usize = 10;

/// Contiguous index window over the shared date axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start_index: usize,
    pub visible_count: usize,
}

impl Default for DateWindow {
    fn default() -> Self {
        Self {
            start_index: 0,
            visible_count: DEFAULT_VISIBLE_COUNT,
        }
    }
}

impl DateWindow {
    #[must_use]
    pub fn new(start_index: usize, visible_count: usize) -> Self {
        Self {
            start_index,
            visible_count,
        }
    }

    /// Exclusive end index.
    #[must_use]
    pub fn end_index(self) -> usize {
        self.start_index + self.visible_count
    }
}

/// Owns the date axis and the window currently shown over it.
///
/// Every mutation re-clamps so `start_index + visible_count <= len` holds.
/// With an empty axis the window collapses to `(0, 0)` and all navigation
/// is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    axis: UniqueDateAxis,
    window: DateWindow,
    min_zoom_count: usize,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(UniqueDateAxis::default(), DEFAULT_VISIBLE_COUNT)
    }
}

impl ViewportController {
    #[must_use]
    pub fn new(axis: UniqueDateAxis, initial_visible_count: usize) -> Self {
        let mut controller = Self {
            axis,
            window: DateWindow::default(),
            min_zoom_count: 2,
        };
        controller.set_window(0, initial_visible_count);
        controller
    }

    /// Smallest window that zooming in may produce (still capped by the axis length).
    #[must_use]
    pub fn with_min_zoom_count(mut self, min_zoom_count: usize) -> Self {
        self.min_zoom_count = min_zoom_count.max(1);
        self
    }

    /// Swaps in a freshly built axis and starts again from the first date.
    pub fn reset(&mut self, axis: UniqueDateAxis, initial_visible_count: usize) {
        self.axis = axis;
        self.set_window(0, initial_visible_count);
    }

    #[must_use]
    pub fn axis(&self) -> &UniqueDateAxis {
        &self.axis
    }

    #[must_use]
    pub fn total_dates(&self) -> usize {
        self.axis.len()
    }

    #[must_use]
    pub fn window(&self) -> DateWindow {
        self.window
    }

    #[must_use]
    pub fn window_end(&self) -> usize {
        self.window.end_index().min(self.axis.len())
    }

    #[must_use]
    pub fn visible_dates(&self) -> &[NaiveDate] {
        &self.axis.dates()[self.window.start_index..self.window_end()]
    }

    /// Clamps and applies a window. Returns whether it changed.
    pub fn set_window(&mut self, start_index: usize, visible_count: usize) -> bool {
        let total = self.axis.len();
        let next = if total == 0 {
            DateWindow::new(0, 0)
        } else {
            let visible_count = visible_count.clamp(1, total);
            let start_index = start_index.min(total - visible_count);
            DateWindow::new(start_index, visible_count)
        };

        let changed = next != self.window;
        if changed {
            trace!(
                start_index = next.start_index,
                visible_count = next.visible_count,
                total,
                "viewport window updated"
            );
        }
        self.window = next;
        changed
    }

    /// First and last visible dates.
    #[must_use]
    pub fn window_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let end = self.window_end();
        if end == 0 {
            return None;
        }
        Some((
            self.axis.get(self.window.start_index)?,
            self.axis.get(end - 1)?,
        ))
    }

    /// Scales the visible count by `factor` around `center_date`, or around the
    /// current middle of the window when no center is given.
    ///
    /// `factor > 1.0` zooms out, `0.0 < factor < 1.0` zooms in. A window that
    /// would run past either end of the axis is shifted back inside rather
    /// than shortened; it only shrinks when the axis itself is shorter.
    pub fn zoom(&mut self, factor: f64, center_date: Option<NaiveDate>) -> ChartResult<bool> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        let total = self.axis.len();
        if total == 0 || factor == 1.0 {
            return Ok(false);
        }

        let current = self.window.visible_count;
        let center = match center_date.and_then(|date| self.axis.nearest_index(date)) {
            Some(index) => index as f64,
            None => self.window.start_index as f64 + (current as f64 - 1.0) / 2.0,
        };

        let mut target = (current as f64 * factor).round() as usize;
        // one wheel notch must always move at least one date
        if factor > 1.0 && target <= current {
            target = current + 1;
        } else if factor < 1.0 && target >= current {
            target = current.saturating_sub(1);
        }
        let floor = self.min_zoom_count.min(total).max(1);
        let target = target.clamp(floor, total);

        let start = (center - (target as f64 - 1.0) / 2.0).round().max(0.0) as usize;
        Ok(self.set_window(start, target))
    }

    /// Shifts the window by `delta_fraction` of its width, at least one date.
    pub fn pan(&mut self, delta_fraction: f64) -> ChartResult<bool> {
        if !delta_fraction.is_finite() {
            return Err(ChartError::InvalidData(
                "pan delta fraction must be finite".to_owned(),
            ));
        }
        if delta_fraction == 0.0 || self.axis.is_empty() {
            return Ok(false);
        }

        let mut steps = (delta_fraction * self.window.visible_count as f64).round() as i64;
        if steps == 0 {
            steps = if delta_fraction > 0.0 { 1 } else { -1 };
        }
        Ok(self.pan_steps(steps))
    }

    /// Shifts the window by whole axis dates.
    pub fn pan_steps(&mut self, steps: i64) -> bool {
        let start = i64::try_from(self.window.start_index).unwrap_or(i64::MAX);
        let next = start.saturating_add(steps).max(0);
        let next = usize::try_from(next).unwrap_or(usize::MAX);
        self.set_window(next, self.window.visible_count)
    }

    /// Shows every date on the axis.
    pub fn fit_all(&mut self) -> bool {
        self.set_window(0, self.axis.len())
    }
}
