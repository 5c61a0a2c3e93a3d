use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// Best chart rank that can be plotted.
pub const MIN_CHART_POSITION: i64 = 1;
/// Worst chart rank that can be plotted.
pub const MAX_CHART_POSITION: i64 = 100;

/// Pixel size of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One weekly appearance of a song on the chart, as exported by the server.
///
/// Values are kept raw: `date` may fail to parse and `position` may be out of
/// the plottable range. The normalizer decides what gets drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub position: Option<i64>,
    #[serde(
        default,
        alias = "weeks_on_chart",
        alias = "weeks",
        deserialize_with = "deserialize_lenient_u32"
    )]
    pub weeks_on_chart: Option<u32>,
}

impl ChartEntry {
    #[must_use]
    pub fn new(date: impl Into<String>, position: i64, weeks_on_chart: u32) -> Self {
        Self {
            date: date.into(),
            position: Some(position),
            weeks_on_chart: Some(weeks_on_chart),
        }
    }

    /// Parses `YYYY-MM-DD`, tolerating a trailing time component.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let text = self.date.trim();
        let day = text.get(..10).unwrap_or(text);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Returns the rank when it lies inside `[1, 100]`.
    #[must_use]
    pub fn plottable_position(&self) -> Option<u8> {
        self.position
            .filter(|position| (MIN_CHART_POSITION..=MAX_CHART_POSITION).contains(position))
            .and_then(|position| u8::try_from(position).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub name: String,
    #[serde(default, alias = "featured_artists")]
    pub featured_artists: Vec<String>,
    #[serde(default, alias = "chart_history")]
    pub chart_history: Vec<ChartEntry>,
    #[serde(
        default,
        alias = "peak_position",
        deserialize_with = "deserialize_lenient_i64"
    )]
    pub peak_position: Option<i64>,
    #[serde(
        default,
        alias = "total_weeks",
        deserialize_with = "deserialize_lenient_u32"
    )]
    pub total_weeks: Option<u32>,
}

impl Song {
    /// Builds a song and derives its peak and week count from `chart_history`.
    #[must_use]
    pub fn from_history(
        name: impl Into<String>,
        featured_artists: Vec<String>,
        chart_history: Vec<ChartEntry>,
    ) -> Self {
        let mut song = Self {
            name: name.into(),
            featured_artists,
            chart_history,
            peak_position: None,
            total_weeks: None,
        };
        song.recompute_summary();
        song
    }

    /// Re-derives `peak_position` (best plottable rank) and `total_weeks`
    /// (entry count) so they never disagree with the history.
    pub fn recompute_summary(&mut self) {
        self.peak_position = self
            .chart_history
            .iter()
            .filter_map(ChartEntry::plottable_position)
            .min()
            .map(i64::from);
        self.total_weeks = Some(u32::try_from(self.chart_history.len()).unwrap_or(u32::MAX));
    }

    /// Song title with featured artists appended, as shown in legends.
    #[must_use]
    pub fn display_label(&self) -> String {
        let featured: Vec<&str> = self
            .featured_artists
            .iter()
            .map(|artist| artist.trim())
            .filter(|artist| !artist.is_empty())
            .collect();
        if featured.is_empty() {
            self.name.clone()
        } else {
            format!("{} (feat. {})", self.name, featured.join(", "))
        }
    }
}

/// Full chart history of one artist, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDataset {
    pub name: String,
    #[serde(default, alias = "normalized_name")]
    pub normalized_name: String,
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default, alias = "last_updated")]
    pub last_updated: Option<String>,
}

impl ArtistDataset {
    #[must_use]
    pub fn new(name: impl Into<String>, songs: Vec<Song>) -> Self {
        let name = name.into();
        let normalized_name = Self::normalize_name(&name);
        Self {
            name,
            normalized_name,
            songs,
            last_updated: None,
        }
        .canonicalized()
    }

    /// Parses a raw export and re-derives the normalized name and song summaries.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let dataset: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse artist dataset: {e}")))?;
        Ok(dataset.canonicalized())
    }

    pub fn from_json_value(value: Value) -> ChartResult<Self> {
        let dataset: Self = serde_json::from_value(value)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse artist dataset: {e}")))?;
        Ok(dataset.canonicalized())
    }

    /// Lowercases and collapses runs of non-alphanumeric characters into `-`.
    #[must_use]
    pub fn normalize_name(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        let mut pending_dash = false;
        for ch in name.chars() {
            if ch.is_alphanumeric() {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                out.extend(ch.to_lowercase());
            } else {
                pending_dash = true;
            }
        }
        out
    }

    #[must_use]
    pub fn with_last_updated(mut self, last_updated: impl Into<String>) -> Self {
        self.last_updated = Some(last_updated.into());
        self
    }

    /// Accepts RFC 3339 or the `YYYY-MM-DD HH:MM:SS` form WordPress emits.
    #[must_use]
    pub fn last_updated_at(&self) -> Option<NaiveDateTime> {
        let raw = self.last_updated.as_deref()?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.naive_utc());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok()
    }

    #[must_use]
    pub fn song(&self, name: &str) -> Option<&Song> {
        self.songs.iter().find(|song| song.name == name)
    }

    fn canonicalized(mut self) -> Self {
        if self.normalized_name.trim().is_empty() {
            self.normalized_name = Self::normalize_name(&self.name);
        }
        for song in &mut self.songs {
            song.recompute_summary();
        }
        self
    }
}

fn lenient_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|v| v.is_finite() && v.fract() == 0.0)
                .map(|v| v as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_integer(&value))
}

fn deserialize_lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_integer(&value).and_then(|v| u32::try_from(v).ok()))
}
