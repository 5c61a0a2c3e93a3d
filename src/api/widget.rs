use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::core::{
    ArtistDataset, DateWindow, NormalizedSeries, ScrollbarSync, ThumbGeometry, UniqueDateAxis,
    Viewport, ViewportController, normalize_dataset, percentage_to_start_index,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    InteractionMode, InteractionState, WheelGesture, WheelInput, resolve_wheel_gesture,
};
use crate::render::{ChartView, RenderFrame, Renderer};

use super::{
    ArtistChartsRequest, DataSource, LoadTicket, RequestTracker, WidgetConfig, build_chart_view,
    build_render_frame,
};

/// One mounted chart-history widget.
///
/// Owns its dataset, normalized series, date window, scrollbar state and
/// renderer, so any number of widgets can live side by side. All mutation
/// happens through `&mut self` from the host's event handlers.
pub struct ChartWidget<R: Renderer> {
    renderer: R,
    config: WidgetConfig,
    dataset: Option<ArtistDataset>,
    series: Vec<NormalizedSeries>,
    viewport: ViewportController,
    scrollbar: ScrollbarSync,
    interaction: InteractionState,
    requests: RequestTracker,
    status_message: Option<String>,
    mounted: bool,
}

impl<R: Renderer> ChartWidget<R> {
    pub fn new(renderer: R, config: WidgetConfig) -> ChartResult<Self> {
        config.validate()?;
        let scrollbar = ScrollbarSync::new(config.scrollbar, f64::from(config.viewport.width))?;
        let viewport =
            ViewportController::new(UniqueDateAxis::default(), config.initial_visible_count)
                .with_min_zoom_count(config.wheel.min_visible_count);
        debug!(artist = %config.artist, "mounted chart widget");
        Ok(Self {
            renderer,
            config,
            dataset: None,
            series: Vec::new(),
            viewport,
            scrollbar,
            interaction: InteractionState::default(),
            requests: RequestTracker::new(),
            status_message: None,
            mounted: true,
        })
    }

    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[must_use]
    pub fn artist(&self) -> &str {
        &self.config.artist
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn dataset(&self) -> Option<&ArtistDataset> {
        self.dataset.as_ref()
    }

    #[must_use]
    pub fn series(&self) -> &[NormalizedSeries] {
        &self.series
    }

    #[must_use]
    pub fn axis(&self) -> &UniqueDateAxis {
        self.viewport.axis()
    }

    #[must_use]
    pub fn window(&self) -> DateWindow {
        self.viewport.window()
    }

    #[must_use]
    pub fn window_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.viewport.window_bounds()
    }

    #[must_use]
    pub fn thumb_geometry(&self) -> ThumbGeometry {
        self.scrollbar
            .thumb_geometry(self.viewport.window(), self.viewport.total_dates())
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    /// User-facing message for the last failed load, if any.
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Starts a load. Any earlier outstanding ticket becomes stale.
    pub fn begin_load(&mut self) -> ChartResult<LoadTicket> {
        self.ensure_mounted()?;
        Ok(self.requests.issue())
    }

    /// Applies the outcome of a load started with `begin_load`.
    ///
    /// Results for superseded tickets are ignored and reported as
    /// `StaleResponse`. A failed fetch leaves any previous dataset in place,
    /// renders the status message and still returns the fetch error.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: ChartResult<ArtistDataset>,
    ) -> ChartResult<()> {
        self.ensure_mounted()?;
        self.requests.accept(ticket)?;
        match result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(err) => {
                warn!(artist = %self.config.artist, error = %err, "chart data load failed");
                self.status_message = Some(format!(
                    "Unable to load chart data for {}. Please reload to try again.",
                    self.config.artist
                ));
                if let Err(render_err) = self.render() {
                    warn!(error = %render_err, "failed to render load error status");
                }
                Err(err)
            }
        }
    }

    /// Fetches from `source`, applies the result and renders.
    pub fn load_from<S: DataSource + ?Sized>(
        &mut self,
        source: &S,
        nonce: &str,
    ) -> ChartResult<()> {
        let ticket = self.begin_load()?;
        let request = ArtistChartsRequest::new(self.config.artist.clone(), nonce);
        let result = source.fetch(&request);
        self.complete_load(ticket, result)?;
        self.render()
    }

    /// Replaces the dataset wholesale and resets the window to the first dates.
    ///
    /// Does not render; the host calls `render` when it is ready to draw.
    pub fn set_dataset(&mut self, dataset: ArtistDataset) -> ChartResult<()> {
        self.ensure_mounted()?;
        let normalized = normalize_dataset(&dataset, self.config.gap_policy);
        debug!(
            artist = %dataset.name,
            songs = normalized.series.len(),
            unique_dates = normalized.axis.len(),
            plotted_points = normalized.plotted_point_count(),
            "loaded artist dataset"
        );
        self.series = normalized.series;
        self.viewport
            .reset(normalized.axis, self.config.initial_visible_count);
        self.scrollbar.end_drag();
        self.interaction.on_thumb_drag_end();
        self.dataset = Some(dataset);
        self.status_message = None;
        Ok(())
    }

    /// Sets the window directly (clamped) and re-renders when it moved.
    pub fn set_window(&mut self, start_index: usize, visible_count: usize) -> ChartResult<bool> {
        self.ensure_mounted()?;
        let changed = self.viewport.set_window(start_index, visible_count);
        self.render_if(changed)
    }

    /// Moves the window so the thumb sits at `percentage` of its travel.
    pub fn scroll_to_percentage(&mut self, percentage: f64) -> ChartResult<bool> {
        self.ensure_mounted()?;
        if !percentage.is_finite() {
            return Err(ChartError::InvalidData(
                "scroll percentage must be finite".to_owned(),
            ));
        }
        let window = self.viewport.window();
        let total = self.viewport.total_dates();
        let start = percentage_to_start_index(percentage, window.visible_count, total);
        let changed = self.viewport.set_window(start, window.visible_count);
        self.render_if(changed)
    }

    /// Plain wheel zooms around the window's middle; with the pan modifier
    /// it pans by a fraction of the window.
    pub fn on_wheel(&mut self, input: WheelInput) -> ChartResult<bool> {
        self.ensure_mounted()?;
        let Some(gesture) = resolve_wheel_gesture(input, self.config.wheel)? else {
            return Ok(false);
        };
        let changed = match gesture {
            WheelGesture::Zoom { factor } => self.viewport.zoom(factor, None)?,
            WheelGesture::Pan { delta_fraction } => self.viewport.pan(delta_fraction)?,
        };
        self.render_if(changed)
    }

    /// Zooms around a specific date, e.g. the one under the pointer.
    pub fn zoom_at(&mut self, factor: f64, center: NaiveDate) -> ChartResult<bool> {
        self.ensure_mounted()?;
        let changed = self.viewport.zoom(factor, Some(center))?;
        self.render_if(changed)
    }

    pub fn on_thumb_pointer_down(&mut self, pointer_x: f64) -> ChartResult<()> {
        self.ensure_mounted()?;
        self.scrollbar.begin_drag(
            pointer_x,
            self.viewport.window(),
            self.viewport.total_dates(),
        )?;
        self.interaction.on_thumb_drag_start(pointer_x);
        Ok(())
    }

    pub fn on_thumb_pointer_move(&mut self, pointer_x: f64) -> ChartResult<bool> {
        self.ensure_mounted()?;
        let Some(percentage) = self.scrollbar.drag_move(pointer_x)? else {
            return Ok(false);
        };
        self.interaction.on_thumb_drag_move(pointer_x);
        self.scroll_to_percentage(percentage)
    }

    pub fn on_thumb_pointer_up(&mut self) -> bool {
        self.interaction.on_thumb_drag_end();
        self.scrollbar.end_drag()
    }

    /// Click on the track outside a drag: jump the thumb there.
    pub fn on_track_click(&mut self, pointer_x: f64) -> ChartResult<bool> {
        self.ensure_mounted()?;
        if self.scrollbar.is_dragging() {
            return Ok(false);
        }
        let percentage = self.scrollbar.click_track(
            pointer_x,
            self.viewport.window(),
            self.viewport.total_dates(),
        )?;
        self.scroll_to_percentage(percentage)
    }

    /// Applies a new surface size; the scrollbar track follows the width.
    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.ensure_mounted()?;
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.scrollbar.set_track_width(f64::from(viewport.width))?;
        self.interaction.on_thumb_drag_end();
        self.config.viewport = viewport;
        self.render()
    }

    #[must_use]
    pub fn chart_view(&self) -> ChartView {
        let songs = self
            .dataset
            .as_ref()
            .map_or(&[][..], |dataset| dataset.songs.as_slice());
        let mut view = build_chart_view(
            &self.config.artist,
            songs,
            &self.series,
            &self.viewport,
            self.config.show_legend,
        );
        view.status_message.clone_from(&self.status_message);
        view
    }

    /// Builds a fresh frame and hands it to the renderer.
    ///
    /// Graphical backends get projected primitives; the rest only the view.
    pub fn render(&mut self) -> ChartResult<()> {
        self.ensure_mounted()?;
        let view = self.chart_view();
        let frame = if self.renderer.is_graphical() {
            build_render_frame(
                &view,
                self.config.viewport,
                self.thumb_geometry(),
                self.scrollbar.config(),
            )?
        } else {
            RenderFrame::summary(self.config.viewport, view)
        };
        self.renderer.render(&frame)
    }

    /// Tears the widget down: drops data, invalidates outstanding loads,
    /// and releases renderer resources. Later calls fail with
    /// `WidgetDestroyed`; calling `destroy` twice is harmless.
    pub fn destroy(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.requests.cancel_all();
        self.scrollbar.end_drag();
        self.interaction.on_thumb_drag_end();
        self.dataset = None;
        self.series = Vec::new();
        self.viewport
            .reset(UniqueDateAxis::default(), self.config.initial_visible_count);
        self.status_message = None;
        self.renderer.release();
        debug!(artist = %self.config.artist, "destroyed chart widget");
    }

    #[must_use]
    pub fn into_renderer(mut self) -> R {
        self.destroy();
        self.renderer
    }

    fn render_if(&mut self, changed: bool) -> ChartResult<bool> {
        if changed {
            self.render()?;
        }
        Ok(changed)
    }

    fn ensure_mounted(&self) -> ChartResult<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(ChartError::WidgetDestroyed)
        }
    }
}
