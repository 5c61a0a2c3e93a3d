use chrono::{Duration, NaiveDate};

use crate::core::{
    MAX_CHART_POSITION, MIN_CHART_POSITION, NormalizedSeries, SeriesPoint, Song,
    ViewportController,
};
use crate::render::{ChartDataset, ChartView, DatasetPoint, color_for_song};

/// Binds normalized series and the current window into a `ChartView`.
///
/// Only points inside the window are emitted. A `None` point is inserted
/// ahead of every point that starts a new run, dated the day after the
/// previous plotted point, so backends that join consecutive points still
/// leave the gap open.
#[must_use]
pub fn build_chart_view(
    artist: &str,
    songs: &[Song],
    series: &[NormalizedSeries],
    controller: &ViewportController,
    show_legend: bool,
) -> ChartView {
    let x_range = controller.window_bounds();
    let datasets = series
        .iter()
        .map(|s| {
            let song = songs.iter().find(|song| song.name == s.song_name);
            let points = match x_range {
                Some((start, end)) => dataset_points(s.points_between(start, end)),
                None => Vec::new(),
            };
            ChartDataset {
                song_name: s.song_name.clone(),
                label: s.label.clone(),
                color: color_for_song(&s.song_name),
                points,
                peak_position: s.peak_position(),
                total_weeks: song
                    .and_then(|song| song.total_weeks)
                    .unwrap_or_else(|| u32::try_from(s.points.len()).unwrap_or(u32::MAX)),
            }
        })
        .collect();

    ChartView {
        artist: artist.to_owned(),
        x_range,
        y_range: (rank_bound(MIN_CHART_POSITION), rank_bound(MAX_CHART_POSITION)),
        show_legend,
        window: controller.window(),
        total_dates: controller.total_dates(),
        labels: controller.visible_dates().to_vec(),
        datasets,
        status_message: None,
    }
}

fn dataset_points(points: &[SeriesPoint]) -> Vec<DatasetPoint> {
    let mut out = Vec::with_capacity(points.len() + 1);
    let mut previous: Option<NaiveDate> = None;
    for point in points {
        if point.gap_before {
            if let Some(previous) = previous {
                out.push(DatasetPoint {
                    date: previous + Duration::days(1),
                    position: None,
                });
            }
        }
        out.push(DatasetPoint {
            date: point.date,
            position: Some(point.position),
        });
        previous = Some(point.date);
    }
    out
}

fn rank_bound(value: i64) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}
