pub mod normalize;
pub mod scale;
pub mod scrollbar;
pub mod types;
pub mod viewport_controller;

pub use normalize::{
    DEFAULT_MAX_GAP_WEEKS, GapPolicy, NormalizedDataset, NormalizedSeries, SeriesPoint,
    UniqueDateAxis, normalize_dataset, normalize_song,
};
pub use scale::LinearScale;
pub use scrollbar::{
    ScrollbarConfig, ScrollbarSync, ThumbGeometry, percentage_to_start_index,
    start_index_to_percentage, thumb_fraction,
};
pub use types::{
    ArtistDataset, ChartEntry, MAX_CHART_POSITION, MIN_CHART_POSITION, Song, Viewport,
};
pub use viewport_controller::{DEFAULT_VISIBLE_COUNT, DateWindow, ViewportController};
