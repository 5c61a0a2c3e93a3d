use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI};
use std::io::Write;
use tracing::trace;

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive};

/// Counts from the most recent draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Draws frames onto an offscreen ARGB surface sized to the widget or card.
///
/// Chart snapshots and promo cards leave the process through `write_png`.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: Option<ImageSurface>,
    font_family: String,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn for_viewport(viewport: Viewport) -> ChartResult<Self> {
        let invalid = || ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        };
        if !viewport.is_valid() {
            return Err(invalid());
        }
        let width = i32::try_from(viewport.width).map_err(|_| invalid())?;
        let height = i32::try_from(viewport.height).map_err(|_| invalid())?;

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface: Some(surface),
            font_family: "Sans".to_owned(),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.surface.is_none()
    }

    /// Encodes the surface as PNG.
    pub fn write_png<W: Write>(&self, out: &mut W) -> ChartResult<()> {
        self.surface()?
            .write_to_png(out)
            .map_err(|err| ChartError::InvalidData(format!("failed to encode png: {err}")))
    }

    fn surface(&self) -> ChartResult<&ImageSurface> {
        self.surface
            .as_ref()
            .ok_or_else(|| ChartError::InvalidData("cairo surface was released".to_owned()))
    }

    fn draw_text(&self, context: &Context, text: &TextPrimitive) {
        let layout = pangocairo::functions::create_layout(context);
        let font = FontDescription::from_string(&format!(
            "{} {}px",
            self.font_family, text.font_size_px
        ));
        layout.set_font_description(Some(&font));
        layout.set_text(&text.text);

        let (text_width, _) = layout.pixel_size();
        let x = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
            TextHAlign::Right => text.x - f64::from(text_width),
        };
        let color = text.color;
        context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
        context.move_to(x, text.y);
        pangocairo::functions::show_layout(context, &layout);
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        let context = Context::new(self.surface()?)
            .map_err(|err| backend_error("failed to create cairo context", err))?;

        // frames start with an opaque background rect, so no clear pass
        for rect in &frame.rects {
            fill_rect(&context, rect)?;
        }
        for line in &frame.lines {
            stroke_line(&context, line)?;
        }
        for text in &frame.texts {
            self.draw_text(&context, text);
        }

        self.last_stats = CairoRenderStats {
            lines_drawn: frame.lines.len(),
            rects_drawn: frame.rects.len(),
            texts_drawn: frame.texts.len(),
        };
        trace!(
            lines = frame.lines.len(),
            rects = frame.rects.len(),
            texts = frame.texts.len(),
            "cairo frame drawn"
        );
        Ok(())
    }

    fn release(&mut self) {
        self.surface = None;
    }
}

fn fill_rect(context: &Context, rect: &RectPrimitive) -> ChartResult<()> {
    rounded_rect_path(context, rect);
    let fill = rect.fill_color;
    context.set_source_rgba(fill.red, fill.green, fill.blue, fill.alpha);
    if rect.border_width <= 0.0 {
        return context
            .fill()
            .map_err(|err| backend_error("failed to fill rectangle", err));
    }
    context
        .fill_preserve()
        .map_err(|err| backend_error("failed to fill rectangle", err))?;
    let border = rect.border_color;
    context.set_source_rgba(border.red, border.green, border.blue, border.alpha);
    context.set_line_width(rect.border_width);
    context
        .stroke()
        .map_err(|err| backend_error("failed to stroke rectangle border", err))
}

fn stroke_line(context: &Context, line: &LinePrimitive) -> ChartResult<()> {
    let color = line.color;
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
    context.set_line_width(line.stroke_width);
    context.set_line_cap(cairo::LineCap::Round);
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    context
        .stroke()
        .map_err(|err| backend_error("failed to stroke line", err))
}

fn rounded_rect_path(context: &Context, rect: &RectPrimitive) {
    let radius = rect
        .corner_radius
        .min(rect.width / 2.0)
        .min(rect.height / 2.0);
    if radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);
    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
