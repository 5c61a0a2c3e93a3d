use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{ArtistDataset, Song};
use crate::error::{ChartError, ChartResult};

/// Default absence, in weeks, after which a song's line is broken.
pub const DEFAULT_MAX_GAP_WEEKS: u32 = 26;

/// Decides when two consecutive chart appearances must not be joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapPolicy {
    pub max_gap_weeks: u32,
}

impl Default for GapPolicy {
    fn default() -> Self {
        Self {
            max_gap_weeks: DEFAULT_MAX_GAP_WEEKS,
        }
    }
}

impl GapPolicy {
    #[must_use]
    pub fn new(max_gap_weeks: u32) -> Self {
        Self { max_gap_weeks }
    }

    pub fn validate(self) -> ChartResult<Self> {
        if self.max_gap_weeks == 0 {
            return Err(ChartError::InvalidData(
                "gap policy max_gap_weeks must be >= 1".to_owned(),
            ));
        }
        Ok(self)
    }

    /// True when `next` comes more than `max_gap_weeks` weeks after `previous`.
    #[must_use]
    pub fn breaks_between(self, previous: NaiveDate, next: NaiveDate) -> bool {
        let days = (next - previous).num_days();
        days > i64::from(self.max_gap_weeks) * 7
    }
}

/// One plotted appearance.
///
/// `gap_before` marks that the line must not connect this point to the
/// previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub position: u8,
    pub gap_before: bool,
}

/// Chronological, date-unique, plottable series for one song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    pub song_name: String,
    pub label: String,
    pub points: Vec<SeriesPoint>,
    pub dropped: usize,
}

impl NormalizedSeries {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn peak_position(&self) -> Option<u8> {
        self.points.iter().map(|point| point.position).min()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|point| point.date)
    }

    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|point| point.date)
    }

    /// Number of line segments the series splits into.
    #[must_use]
    pub fn run_count(&self) -> usize {
        if self.points.is_empty() {
            return 0;
        }
        1 + self.points.iter().filter(|point| point.gap_before).count()
    }

    /// Points whose date lies inside `[start, end]`.
    #[must_use]
    pub fn points_between(&self, start: NaiveDate, end: NaiveDate) -> &[SeriesPoint] {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let from = self.points.partition_point(|point| point.date < start);
        let to = self.points.partition_point(|point| point.date <= end);
        &self.points[from..to]
    }
}

/// Sorted, duplicate-free union of every plotted date in a dataset.
///
/// Rebuilt from scratch whenever the dataset changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueDateAxis {
    dates: Vec<NaiveDate>,
}

impl UniqueDateAxis {
    #[must_use]
    pub fn from_series(series: &[NormalizedSeries]) -> Self {
        Self::from_dates(
            series
                .iter()
                .flat_map(|s| s.points.iter().map(|point| point.date)),
        )
    }

    #[must_use]
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
        dates.sort_unstable();
        dates.dedup();
        Self { dates }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }

    #[must_use]
    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    #[must_use]
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Index of the axis date closest to `date`; ties resolve to the earlier one.
    #[must_use]
    pub fn nearest_index(&self, date: NaiveDate) -> Option<usize> {
        if self.dates.is_empty() {
            return None;
        }
        let upper = self.dates.partition_point(|d| *d < date);
        if upper == 0 {
            return Some(0);
        }
        if upper == self.dates.len() {
            return Some(self.dates.len() - 1);
        }
        let before = (date - self.dates[upper - 1]).num_days();
        let after = (self.dates[upper] - date).num_days();
        Some(if after < before { upper } else { upper - 1 })
    }
}

/// Normalized series for every song plus their shared date axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDataset {
    pub series: Vec<NormalizedSeries>,
    pub axis: UniqueDateAxis,
}

impl NormalizedDataset {
    #[must_use]
    pub fn plotted_point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Converts one song's raw history into a plottable series.
///
/// Entries with unparseable dates or ranks outside `[1, 100]` are dropped.
/// A dropped rank breaks the line at the next plotted entry, as does an
/// absence longer than the policy allows. Repeated dates keep the last
/// entry, even when that entry is the unplottable one.
#[must_use]
pub fn normalize_song(song: &Song, policy: GapPolicy) -> NormalizedSeries {
    let mut dated = Vec::with_capacity(song.chart_history.len());
    let mut dropped = 0usize;

    for entry in &song.chart_history {
        match entry.parsed_date() {
            Some(date) => dated.push((date, entry.plottable_position())),
            None => {
                trace!(
                    song = %song.name,
                    date = %entry.date,
                    "dropping entry with unparseable date"
                );
                dropped += 1;
            }
        }
    }

    // stable: equal dates keep export order so the last one wins below
    dated.sort_by_key(|(date, _)| *date);

    let mut latest: Vec<(NaiveDate, Option<u8>)> = Vec::with_capacity(dated.len());
    for (date, position) in dated {
        match latest.last_mut() {
            Some(last) if last.0 == date => {
                trace!(song = %song.name, %date, "replacing same-date entry");
                last.1 = position;
                dropped += 1;
            }
            _ => latest.push((date, position)),
        }
    }

    let mut points: Vec<SeriesPoint> = Vec::with_capacity(latest.len());
    let mut previous_unplottable = false;

    for (date, position) in latest {
        let Some(position) = position else {
            trace!(song = %song.name, %date, "dropping entry with out-of-range position");
            dropped += 1;
            previous_unplottable = true;
            continue;
        };

        let gap_before = points.last().is_some_and(|last| {
            previous_unplottable || policy.breaks_between(last.date, date)
        });
        points.push(SeriesPoint {
            date,
            position,
            gap_before,
        });
        previous_unplottable = false;
    }

    debug!(
        song = %song.name,
        raw_count = song.chart_history.len(),
        plotted_count = points.len(),
        dropped,
        "normalized song series"
    );

    NormalizedSeries {
        song_name: song.name.clone(),
        label: song.display_label(),
        points,
        dropped,
    }
}

/// Normalizes every song and builds the shared date axis.
#[must_use]
pub fn normalize_dataset(dataset: &ArtistDataset, policy: GapPolicy) -> NormalizedDataset {
    #[cfg(feature = "parallel-normalize")]
    let series: Vec<NormalizedSeries> = {
        use rayon::prelude::*;
        dataset
            .songs
            .par_iter()
            .map(|song| normalize_song(song, policy))
            .collect()
    };

    #[cfg(not(feature = "parallel-normalize"))]
    let series: Vec<NormalizedSeries> = dataset
        .songs
        .iter()
        .map(|song| normalize_song(song, policy))
        .collect();

    let axis = UniqueDateAxis::from_series(&series);
    debug!(
        artist = %dataset.name,
        songs = series.len(),
        unique_dates = axis.len(),
        "normalized artist dataset"
    );
    NormalizedDataset { series, axis }
}
