use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::ArtistDataset;
use crate::error::{ChartError, ChartResult};

/// AJAX action that serves one artist's chart history.
pub const CHART_DATA_ACTION: &str = "get_artist_chart_data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistChartsRequest {
    pub artist: String,
    pub nonce: String,
}

impl ArtistChartsRequest {
    #[must_use]
    pub fn new(artist: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            nonce: nonce.into(),
        }
    }

    /// Form fields posted to the AJAX endpoint.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("action", CHART_DATA_ACTION),
            ("artist", self.artist.as_str()),
            ("nonce", self.nonce.as_str()),
        ]
    }
}

/// Envelope returned by the endpoint: `data` holds the dataset on success and
/// an error message otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
}

impl ChartDataResponse {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::Fetch(format!("malformed chart data response: {e}")))
    }

    pub fn into_dataset(self) -> ChartResult<ArtistDataset> {
        if !self.success {
            let message = match self.data {
                Value::String(message) => message,
                Value::Object(ref object) => object
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request failed")
                    .to_owned(),
                _ => "request failed".to_owned(),
            };
            return Err(ChartError::Rejected(message));
        }
        ArtistDataset::from_json_value(self.data)
    }
}

/// Anything that can produce an artist's chart history.
pub trait DataSource {
    fn fetch(&self, request: &ArtistChartsRequest) -> ChartResult<ArtistDataset>;
}

/// In-memory datasets keyed by normalized artist name.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    datasets: IndexMap<String, ArtistDataset>,
}

impl StaticSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: ArtistDataset) -> Self {
        self.insert(dataset);
        self
    }

    pub fn insert(&mut self, dataset: ArtistDataset) {
        self.datasets
            .insert(dataset.normalized_name.clone(), dataset);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl DataSource for StaticSource {
    fn fetch(&self, request: &ArtistChartsRequest) -> ChartResult<ArtistDataset> {
        let key = ArtistDataset::normalize_name(&request.artist);
        self.datasets
            .get(&key)
            .cloned()
            .ok_or_else(|| ChartError::Rejected(format!("no chart data for {}", request.artist)))
    }
}

/// Directory of static exports named `<normalized-name>.json`.
///
/// Files may hold either a bare dataset or a `{success, data}` envelope.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    root: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn path_for(&self, artist: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", ArtistDataset::normalize_name(artist)))
    }
}

impl DataSource for JsonFileSource {
    fn fetch(&self, request: &ArtistChartsRequest) -> ChartResult<ArtistDataset> {
        let path = self.path_for(&request.artist);
        debug!(artist = %request.artist, path = %path.display(), "reading chart export");
        load_dataset_file(&path)
    }
}

/// Reads one export file, accepting a bare dataset or a response envelope.
pub fn load_dataset_file(path: &Path) -> ChartResult<ArtistDataset> {
    let raw = fs::read_to_string(path).map_err(|e| {
        ChartError::Fetch(format!("failed to read {}: {e}", path.display()))
    })?;
    parse_dataset_payload(&raw)
}

/// Parses a payload that is either an envelope or a bare dataset.
pub fn parse_dataset_payload(raw: &str) -> ChartResult<ArtistDataset> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ChartError::Fetch(format!("malformed chart data payload: {e}")))?;
    if value.get("success").is_some_and(Value::is_boolean) {
        let response: ChartDataResponse = serde_json::from_value(value)
            .map_err(|e| ChartError::Fetch(format!("malformed chart data response: {e}")))?;
        return response.into_dataset();
    }
    ArtistDataset::from_json_value(value)
}

/// Blocking client for the WordPress AJAX endpoint.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(endpoint: impl Into<String>, timeout: std::time::Duration) -> ChartResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChartError::Fetch(format!("http client error: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[cfg(feature = "http")]
impl DataSource for HttpSource {
    fn fetch(&self, request: &ArtistChartsRequest) -> ChartResult<ArtistDataset> {
        let response: ChartDataResponse = self
            .client
            .post(&self.endpoint)
            .form(&request.form_fields())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ChartError::Fetch(format!("chart data request error: {e}")))?
            .json()
            .map_err(|e| ChartError::Fetch(format!("chart data decode error: {e}")))?;
        response.into_dataset()
    }
}

/// Identifies one load attempt; only the most recent ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoadTicket(u64);

impl LoadTicket {
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Monotonic request counter implementing last-request-wins.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    issued: u64,
    applied: Option<u64>,
}

impl RequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.issued && self.applied != Some(ticket.0)
    }

    /// Marks `ticket` as applied, rejecting superseded or already-applied tickets.
    pub fn accept(&mut self, ticket: LoadTicket) -> ChartResult<()> {
        if !self.is_current(ticket) {
            warn!(
                ticket = ticket.0,
                latest = self.issued,
                "ignoring stale chart data response"
            );
            return Err(ChartError::StaleResponse {
                ticket: ticket.0,
                latest: self.issued,
            });
        }
        self.applied = Some(ticket.0);
        Ok(())
    }

    /// Invalidates every outstanding ticket.
    pub fn cancel_all(&mut self) {
        self.issued += 1;
        self.applied = Some(self.issued);
    }
}

#[cfg(test)]
mod tests {
    use super::RequestTracker;

    #[test]
    fn only_latest_ticket_is_accepted_once() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(tracker.accept(first).is_err());
        assert!(tracker.accept(second).is_ok());
        assert!(tracker.accept(second).is_err());
    }

    #[test]
    fn cancel_all_invalidates_outstanding_tickets() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue();
        tracker.cancel_all();
        assert!(tracker.accept(ticket).is_err());
        let next = tracker.issue();
        assert!(tracker.accept(next).is_ok());
    }
}
