use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::DateWindow;
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::ChartWidget;

pub const WIDGET_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable view of a widget's navigation state, for host diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub artist: String,
    pub mounted: bool,
    pub total_dates: usize,
    pub window: DateWindow,
    pub window_start: Option<NaiveDate>,
    pub window_end: Option<NaiveDate>,
    pub thumb_percentage: f64,
    pub thumb_width_px: f64,
    pub series_count: usize,
    pub plotted_points: usize,
    pub show_legend: bool,
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: WidgetSnapshot,
}

impl WidgetSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = WidgetSnapshotJsonContractV1 {
            schema_version: WIDGET_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<WidgetSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: WidgetSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != WIDGET_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl<R: Renderer> ChartWidget<R> {
    #[must_use]
    pub fn snapshot(&self) -> WidgetSnapshot {
        let bounds = self.window_bounds();
        let thumb = self.thumb_geometry();
        WidgetSnapshot {
            artist: self.artist().to_owned(),
            mounted: self.is_mounted(),
            total_dates: self.axis().len(),
            window: self.window(),
            window_start: bounds.map(|(start, _)| start),
            window_end: bounds.map(|(_, end)| end),
            thumb_percentage: thumb.percentage(),
            thumb_width_px: thumb.width_px,
            series_count: self.series().len(),
            plotted_points: self.series().iter().map(|s| s.points.len()).sum(),
            show_legend: self.config().show_legend,
            status_message: self.status_message().map(str::to_owned),
        }
    }

    pub fn snapshot_json_contract_v1_pretty(&self) -> ChartResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}
