//! chart-history: artist chart-history widget engine.
//!
//! Turns raw weekly chart entries into per-song series on a shared date axis,
//! and keeps a scrollable, zoomable window over that axis in sync with a
//! scrollbar. Drawing is delegated to an injected [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartWidget, WidgetConfig};
pub use error::{ChartError, ChartResult};
