mod frame;
mod null_renderer;
mod palette;
mod primitives;
mod text_renderer;
mod view;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use palette::{SONG_PALETTE, color_for_song};
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};
pub use text_renderer::TextSummaryRenderer;
pub use view::{ChartDataset, ChartView, DatasetPoint};

use crate::error::ChartResult;

/// Rendering capability injected into a widget.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from chart data and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;

    /// Whether the backend draws primitives. Non-graphical backends only get
    /// the frame's `ChartView` and skip pixel projection entirely.
    fn is_graphical(&self) -> bool {
        true
    }

    /// Frees backend resources on widget teardown.
    fn release(&mut self) {}
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        (**self).render(frame)
    }

    fn is_graphical(&self) -> bool {
        (**self).is_graphical()
    }

    fn release(&mut self) {
        (**self).release();
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};
