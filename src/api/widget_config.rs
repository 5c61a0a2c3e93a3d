use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_VISIBLE_COUNT, GapPolicy, ScrollbarConfig, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::WheelBehavior;

pub const DEFAULT_WIDGET_WIDTH: u32 = 800;
pub const DEFAULT_WIDGET_HEIGHT: u32 = 400;

/// Mount configuration for one chart widget.
///
/// Serializable so hosts can keep widget setup next to their page config;
/// every field but `artist` has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub artist: String,
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,
    #[serde(default = "default_show_legend")]
    pub show_legend: bool,
    #[serde(default = "default_initial_visible_count")]
    pub initial_visible_count: usize,
    #[serde(default)]
    pub gap_policy: GapPolicy,
    #[serde(default)]
    pub wheel: WheelBehavior,
    #[serde(default)]
    pub scrollbar: ScrollbarConfig,
}

impl WidgetConfig {
    #[must_use]
    pub fn new(artist: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            viewport: default_viewport(),
            show_legend: default_show_legend(),
            initial_visible_count: default_initial_visible_count(),
            gap_policy: GapPolicy::default(),
            wheel: WheelBehavior::default(),
            scrollbar: ScrollbarConfig::default(),
        }
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_show_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    #[must_use]
    pub fn with_initial_visible_count(mut self, count: usize) -> Self {
        self.initial_visible_count = count;
        self
    }

    #[must_use]
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.gap_policy = policy;
        self
    }

    #[must_use]
    pub fn with_wheel_behavior(mut self, behavior: WheelBehavior) -> Self {
        self.wheel = behavior;
        self
    }

    #[must_use]
    pub fn with_scrollbar(mut self, scrollbar: ScrollbarConfig) -> Self {
        self.scrollbar = scrollbar;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.artist.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "widget artist must not be empty".to_owned(),
            ));
        }
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if self.initial_visible_count == 0 {
            return Err(ChartError::InvalidData(
                "initial visible count must be >= 1".to_owned(),
            ));
        }
        self.gap_policy.validate()?;
        self.wheel.validate()?;
        self.scrollbar.validate()?;
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse widget config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the host element's `data-*` attributes.
    ///
    /// `data-artist` is required. `data-width`, `data-height` and
    /// `data-legend` override the defaults; a `px` suffix on sizes is
    /// accepted. Unknown attributes are ignored.
    pub fn from_data_attributes(attributes: &IndexMap<String, String>) -> ChartResult<Self> {
        let lookup = |name: &str| {
            attributes
                .get(name)
                .or_else(|| attributes.get(name.trim_start_matches("data-")))
                .map(|value| value.trim())
        };

        let artist = lookup("data-artist")
            .filter(|artist| !artist.is_empty())
            .ok_or_else(|| {
                ChartError::InvalidData("chart container is missing data-artist".to_owned())
            })?;

        let mut config = Self::new(artist);
        if let Some(width) = lookup("data-width") {
            config.viewport.width = parse_pixels("data-width", width)?;
        }
        if let Some(height) = lookup("data-height") {
            config.viewport.height = parse_pixels("data-height", height)?;
        }
        if let Some(legend) = lookup("data-legend") {
            config.show_legend = parse_flag("data-legend", legend)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_pixels(attribute: &str, value: &str) -> ChartResult<u32> {
    value
        .trim_end_matches("px")
        .trim()
        .parse::<u32>()
        .map_err(|_| {
            ChartError::InvalidData(format!("{attribute} must be a pixel size, got `{value}`"))
        })
}

fn parse_flag(attribute: &str, value: &str) -> ChartResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" | "show" => Ok(true),
        "0" | "false" | "no" | "off" | "hide" => Ok(false),
        _ => Err(ChartError::InvalidData(format!(
            "{attribute} must be a boolean, got `{value}`"
        ))),
    }
}

fn default_viewport() -> Viewport {
    Viewport::new(DEFAULT_WIDGET_WIDTH, DEFAULT_WIDGET_HEIGHT)
}

fn default_show_legend() -> bool {
    true
}

fn default_initial_visible_count() -> usize {
    DEFAULT_VISIBLE_COUNT
}
