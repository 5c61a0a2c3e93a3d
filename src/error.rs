use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("chart data fetch failed: {0}")]
    Fetch(String),

    #[error("chart data request rejected: {0}")]
    Rejected(String),

    #[error("stale chart data response: ticket={ticket}, latest={latest}")]
    StaleResponse { ticket: u64, latest: u64 },

    #[error("chart widget has been destroyed")]
    WidgetDestroyed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
