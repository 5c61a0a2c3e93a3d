use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless widgets.
///
/// It still validates frame content so tests catch invalid geometry, and
/// records what it saw.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: usize,
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_text_count: usize,
    pub last_dataset_count: usize,
    pub released: bool,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.render_count += 1;
        self.last_line_count = frame.lines.len();
        self.last_rect_count = frame.rects.len();
        self.last_text_count = frame.texts.len();
        self.last_dataset_count = frame.view.as_ref().map_or(0, |view| view.datasets.len());
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
    }
}
