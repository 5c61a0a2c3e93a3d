use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::DateWindow;
use crate::render::Color;

/// One point handed to a chart backend. `position: None` is a gap marker:
/// the line must not be drawn through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetPoint {
    pub date: NaiveDate,
    pub position: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub song_name: String,
    pub label: String,
    pub color: Color,
    pub points: Vec<DatasetPoint>,
    pub peak_position: Option<u8>,
    pub total_weeks: u32,
}

impl ChartDataset {
    /// Plotted (non-gap) points.
    pub fn plotted(&self) -> impl Iterator<Item = (NaiveDate, u8)> + '_ {
        self.points
            .iter()
            .filter_map(|point| point.position.map(|position| (point.date, position)))
    }
}

/// Backend-neutral description of one chart draw: axis bounds plus datasets.
///
/// Every render rebuilds this from scratch, so rendering twice with the same
/// state yields the same view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    pub artist: String,
    /// Visible x-axis bounds; `None` when there is nothing to plot.
    pub x_range: Option<(NaiveDate, NaiveDate)>,
    /// Rank axis bounds, drawn reversed so #1 sits at the top.
    pub y_range: (u8, u8),
    pub show_legend: bool,
    pub window: DateWindow,
    pub total_dates: usize,
    /// Axis dates inside the window, in order.
    pub labels: Vec<NaiveDate>,
    pub datasets: Vec<ChartDataset>,
    /// User-facing notice, set when the last load failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl ChartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x_range.is_none()
    }

    #[must_use]
    pub fn plotted_point_count(&self) -> usize {
        self.datasets.iter().map(|d| d.plotted().count()).sum()
    }
}
