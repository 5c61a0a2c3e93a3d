use std::io::Write;

use crate::error::ChartResult;
use crate::render::{ChartView, RenderFrame, Renderer};

/// Fallback backend that describes the chart as plain text.
///
/// Chosen at construction time by hosts without a graphical backend; it
/// ignores draw primitives and reads the frame's `ChartView`.
#[derive(Debug)]
pub struct TextSummaryRenderer<W: Write> {
    out: W,
    frames_written: usize,
}

impl TextSummaryRenderer<Vec<u8>> {
    /// Renderer that buffers its output in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}

impl<W: Write> TextSummaryRenderer<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            frames_written: 0,
        }
    }

    #[must_use]
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_view(&mut self, view: &ChartView) -> ChartResult<()> {
        if let Some(status) = &view.status_message {
            writeln!(self.out, "{status}")?;
        }
        let Some((start, end)) = view.x_range else {
            writeln!(self.out, "No chart data available for {}.", view.artist)?;
            return Ok(());
        };

        writeln!(
            self.out,
            "Chart history for {} ({start} to {end}, {} of {} chart weeks)",
            view.artist,
            view.labels.len(),
            view.total_dates
        )?;
        for dataset in &view.datasets {
            let peak = dataset
                .peak_position
                .map_or_else(|| "never plotted".to_owned(), |peak| format!("peak #{peak}"));
            let weeks = if dataset.total_weeks == 1 {
                "1 week".to_owned()
            } else {
                format!("{} weeks", dataset.total_weeks)
            };
            writeln!(self.out, "  {} - {peak}, {weeks}", dataset.label)?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TextSummaryRenderer<W> {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        match &frame.view {
            Some(view) => self.write_view(view)?,
            None => {
                for text in &frame.texts {
                    writeln!(self.out, "{}", text.text)?;
                }
            }
        }
        self.out.flush()?;
        self.frames_written += 1;
        Ok(())
    }

    fn is_graphical(&self) -> bool {
        false
    }
}
