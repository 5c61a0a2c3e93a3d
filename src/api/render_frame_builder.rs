use crate::core::{LinearScale, ScrollbarConfig, ThumbGeometry, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ChartView, Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

const PADDING_PX: f64 = 8.0;
const RANK_LABEL_GUTTER_PX: f64 = 36.0;
const LEGEND_ROW_HEIGHT_PX: f64 = 18.0;
const LEGEND_SWATCH_PX: f64 = 12.0;
const LEGEND_MAX_HEIGHT_SHARE: f64 = 0.3;
const LEGEND_OVERFLOW_RESERVE_PX: f64 = 80.0;
const X_LABEL_BAND_PX: f64 = 18.0;
const MIN_X_LABEL_SPACING_PX: f64 = 90.0;
const LABEL_FONT_PX: f64 = 11.0;
const APPROX_CHAR_WIDTH_PX: f64 = 6.5;
const LINE_WIDTH_PX: f64 = 2.0;
const POINT_MARKER_PX: f64 = 4.0;
const RANK_GRID: [u8; 5] = [1, 25, 50, 75, 100];

const BACKGROUND: Color = Color::rgb(1.0, 1.0, 1.0);
const GRID: Color = Color::rgba(0.0, 0.0, 0.0, 0.08);
const AXIS_TEXT: Color = Color::rgb8(0x55, 0x55, 0x55);
const TRACK: Color = Color::rgb8(0xe6, 0xe6, 0xe6);
const THUMB: Color = Color::rgb8(0x99, 0x99, 0x99);
const STATUS_TEXT: Color = Color::rgb8(0xb0, 0x2a, 0x2a);

#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotArea {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl PlotArea {
    fn width(self) -> f64 {
        self.right - self.left
    }

    fn height(self) -> f64 {
        self.bottom - self.top
    }
}

/// Projects a `ChartView` into pixel primitives: legend, rank grid, song
/// lines broken at gap markers, date labels and the scrollbar.
pub fn build_render_frame(
    view: &ChartView,
    viewport: Viewport,
    thumb: ThumbGeometry,
    scrollbar: ScrollbarConfig,
) -> ChartResult<RenderFrame> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);

    let mut frame = RenderFrame::new(viewport)
        .with_view(view.clone())
        .with_rect(RectPrimitive::new(0.0, 0.0, width, height, BACKGROUND));

    let legend_bottom = if view.show_legend {
        push_legend(&mut frame, view, width, height)
    } else {
        PADDING_PX
    };

    let track_top = height - PADDING_PX - scrollbar.track_height_px;
    let x_label_top = track_top - X_LABEL_BAND_PX;
    let plot = PlotArea {
        left: RANK_LABEL_GUTTER_PX,
        top: legend_bottom + 4.0,
        right: width - PADDING_PX,
        bottom: x_label_top - 4.0,
    };
    if plot.width() <= 0.0 || plot.height() <= 0.0 {
        return Err(ChartError::InvalidData(format!(
            "viewport {}x{} is too small for the chart layout",
            viewport.width, viewport.height
        )));
    }

    push_scrollbar(&mut frame, thumb, track_top, scrollbar.track_height_px);

    if view.is_empty() {
        let (message, color) = match &view.status_message {
            Some(status) => (status.clone(), STATUS_TEXT),
            None => (format!("No chart data available for {}", view.artist), AXIS_TEXT),
        };
        frame.texts.push(TextPrimitive::new(
            message,
            width / 2.0,
            (plot.top + plot.bottom) / 2.0,
            LABEL_FONT_PX + 2.0,
            color,
            TextHAlign::Center,
        ));
        return Ok(frame);
    }

    let (rank_min, rank_max) = view.y_range;
    let y_scale = LinearScale::new(
        f64::from(rank_min),
        f64::from(rank_max),
        plot.top,
        plot.bottom,
    )?;
    push_rank_grid(&mut frame, plot, y_scale)?;

    let slots = view.labels.len();
    let x_of = |slot: usize| -> f64 {
        if slots <= 1 {
            (plot.left + plot.right) / 2.0
        } else {
            plot.left + slot as f64 / (slots - 1) as f64 * plot.width()
        }
    };
    push_date_labels(&mut frame, view, plot, x_label_top, &x_of);

    for dataset in &view.datasets {
        let mut previous: Option<(f64, f64)> = None;
        for point in &dataset.points {
            let Some(position) = point.position else {
                previous = None;
                continue;
            };
            let Ok(slot) = view.labels.binary_search(&point.date) else {
                previous = None;
                continue;
            };
            let x = x_of(slot);
            let y = y_scale.map(f64::from(position))?;
            if let Some((px, py)) = previous {
                frame
                    .lines
                    .push(LinePrimitive::new(px, py, x, y, LINE_WIDTH_PX, dataset.color));
            }
            frame.rects.push(RectPrimitive::new(
                x - POINT_MARKER_PX / 2.0,
                y - POINT_MARKER_PX / 2.0,
                POINT_MARKER_PX,
                POINT_MARKER_PX,
                dataset.color,
            ));
            previous = Some((x, y));
        }
    }

    if let Some(status) = &view.status_message {
        push_status_banner(&mut frame, status, plot);
    }

    Ok(frame)
}

fn legend_entry_width(label: &str) -> f64 {
    LEGEND_SWATCH_PX + 6.0 + label.chars().count() as f64 * APPROX_CHAR_WIDTH_PX + 16.0
}

/// Lays legend entries out left to right, wrapping rows, within the top
/// `LEGEND_MAX_HEIGHT_SHARE` of the viewport. Entries that do not fit are
/// summarized as "+N more". Returns the bottom edge.
fn push_legend(frame: &mut RenderFrame, view: &ChartView, width: f64, height: f64) -> f64 {
    let max_rows = (((height * LEGEND_MAX_HEIGHT_SHARE - PADDING_PX) / LEGEND_ROW_HEIGHT_PX)
        .floor() as usize)
        .max(1);
    let right_edge = width - PADDING_PX;
    let total = view.datasets.len();

    let mut x = PADDING_PX;
    let mut row = 0;
    let mut placed = 0;
    for dataset in &view.datasets {
        let entry_width = legend_entry_width(&dataset.label);
        let wraps = placed > 0 && x + entry_width > right_edge;
        let (next_x, next_row) = if wraps { (PADDING_PX, row + 1) } else { (x, row) };
        if next_row >= max_rows {
            break;
        }
        // the last row keeps room for the overflow marker
        let more_follow = placed + 1 < total;
        if placed > 0
            && more_follow
            && next_row + 1 == max_rows
            && next_x + entry_width > right_edge - LEGEND_OVERFLOW_RESERVE_PX
        {
            break;
        }
        x = next_x;
        row = next_row;
        let row_top = PADDING_PX + row as f64 * LEGEND_ROW_HEIGHT_PX;
        frame.rects.push(
            RectPrimitive::new(
                x,
                row_top + 3.0,
                LEGEND_SWATCH_PX,
                LEGEND_SWATCH_PX,
                dataset.color,
            )
            .with_corner_radius(2.0),
        );
        if !dataset.label.is_empty() {
            frame.texts.push(TextPrimitive::new(
                dataset.label.clone(),
                x + LEGEND_SWATCH_PX + 6.0,
                row_top + 2.0,
                LABEL_FONT_PX,
                AXIS_TEXT,
                TextHAlign::Left,
            ));
        }
        x += entry_width;
        placed += 1;
    }
    if placed == 0 {
        return PADDING_PX;
    }

    let row_top = PADDING_PX + row as f64 * LEGEND_ROW_HEIGHT_PX;
    if placed < total {
        frame.texts.push(TextPrimitive::new(
            format!("+{} more", total - placed),
            x,
            row_top + 2.0,
            LABEL_FONT_PX,
            AXIS_TEXT,
            TextHAlign::Left,
        ));
    }
    row_top + LEGEND_ROW_HEIGHT_PX
}

fn push_status_banner(frame: &mut RenderFrame, status: &str, plot: PlotArea) {
    let banner_width = (status.chars().count() as f64 * APPROX_CHAR_WIDTH_PX + 16.0)
        .min(plot.width());
    let center = (plot.left + plot.right) / 2.0;
    frame.rects.push(
        RectPrimitive::new(
            center - banner_width / 2.0,
            plot.top + 4.0,
            banner_width,
            LEGEND_ROW_HEIGHT_PX,
            BACKGROUND.with_alpha(0.9),
        )
        .with_border(1.0, STATUS_TEXT.with_alpha(0.5))
        .with_corner_radius(3.0),
    );
    frame.texts.push(TextPrimitive::new(
        status.to_owned(),
        center,
        plot.top + 6.0,
        LABEL_FONT_PX,
        STATUS_TEXT,
        TextHAlign::Center,
    ));
}

fn push_rank_grid(
    frame: &mut RenderFrame,
    plot: PlotArea,
    y_scale: LinearScale,
) -> ChartResult<()> {
    for rank in RANK_GRID {
        let y = y_scale.map(f64::from(rank))?;
        frame
            .lines
            .push(LinePrimitive::new(plot.left, y, plot.right, y, 1.0, GRID));
        frame.texts.push(TextPrimitive::new(
            format!("#{rank}"),
            plot.left - 4.0,
            y - LABEL_FONT_PX / 2.0,
            LABEL_FONT_PX,
            AXIS_TEXT,
            TextHAlign::Right,
        ));
    }
    Ok(())
}

fn push_date_labels(
    frame: &mut RenderFrame,
    view: &ChartView,
    plot: PlotArea,
    top: f64,
    x_of: impl Fn(usize) -> f64,
) {
    let slots = view.labels.len();
    if slots == 0 {
        return;
    }
    let capacity = ((plot.width() / MIN_X_LABEL_SPACING_PX).floor() as usize).max(1);
    let stride = slots.div_ceil(capacity).max(1);
    for (slot, date) in view.labels.iter().enumerate().step_by(stride) {
        frame.texts.push(TextPrimitive::new(
            date.format("%Y-%m-%d").to_string(),
            x_of(slot),
            top,
            LABEL_FONT_PX,
            AXIS_TEXT,
            TextHAlign::Center,
        ));
    }
}

fn push_scrollbar(frame: &mut RenderFrame, thumb: ThumbGeometry, top: f64, height: f64) {
    let radius = height / 2.0;
    frame.rects.push(
        RectPrimitive::new(0.0, top, thumb.track_width_px, height, TRACK)
            .with_corner_radius(radius),
    );
    frame.rects.push(
        RectPrimitive::new(thumb.offset_px, top, thumb.width_px, height, THUMB)
            .with_corner_radius(radius),
    );
}
