mod data_source;
mod json_contract;
mod promo_card;
mod render_adapter;
mod render_frame_builder;
mod widget;
mod widget_config;

#[cfg(feature = "http")]
pub use data_source::HttpSource;
pub use data_source::{
    ArtistChartsRequest, CHART_DATA_ACTION, ChartDataResponse, DataSource, JsonFileSource,
    LoadTicket, RequestTracker, StaticSource, load_dataset_file, parse_dataset_payload,
};
pub use json_contract::{
    WIDGET_SNAPSHOT_JSON_SCHEMA_V1, WidgetSnapshot, WidgetSnapshotJsonContractV1,
};
pub use promo_card::{CardFormat, CardTheme, PromoCard};
pub use render_adapter::build_chart_view;
pub use render_frame_builder::build_render_frame;
pub use widget::ChartWidget;
pub use widget_config::{DEFAULT_WIDGET_HEIGHT, DEFAULT_WIDGET_WIDTH, WidgetConfig};
