use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    ArtistDataset, GapPolicy, LinearScale, MAX_CHART_POSITION, MIN_CHART_POSITION, SeriesPoint,
    Viewport, normalize_song,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, color_for_song,
};

/// Output sizes used by the social networks the cards are made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFormat {
    /// 1080x1080 feed post.
    Square,
    /// 1080x1920 story.
    Story,
    /// 1200x630 link preview.
    Landscape,
}

impl CardFormat {
    #[must_use]
    pub fn viewport(self) -> Viewport {
        match self {
            Self::Square => Viewport::new(1080, 1080),
            Self::Story => Viewport::new(1080, 1920),
            Self::Landscape => Viewport::new(1200, 630),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardTheme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub panel: Color,
}

impl Default for CardTheme {
    fn default() -> Self {
        Self {
            background: Color::rgb8(0x12, 0x12, 0x16),
            foreground: Color::rgb8(0xff, 0xff, 0xff),
            muted: Color::rgb8(0xa0, 0xa0, 0xaa),
            panel: Color::rgb8(0x22, 0x22, 0x2a),
        }
    }
}

/// Promotional card for one song's chart run.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoCard {
    pub artist: String,
    pub song_label: String,
    pub peak_position: Option<u8>,
    pub total_weeks: u32,
    pub first_charted: Option<NaiveDate>,
    pub last_charted: Option<NaiveDate>,
    pub points: Vec<SeriesPoint>,
    pub accent: Color,
    pub format: CardFormat,
    pub theme: CardTheme,
}

impl PromoCard {
    /// Builds a card for `song_name` from a loaded dataset.
    pub fn from_dataset(
        dataset: &ArtistDataset,
        song_name: &str,
        policy: GapPolicy,
        format: CardFormat,
    ) -> ChartResult<Self> {
        let song = dataset.song(song_name).ok_or_else(|| {
            ChartError::InvalidData(format!(
                "song `{song_name}` is not in {}'s dataset",
                dataset.name
            ))
        })?;
        let series = normalize_song(song, policy);
        Ok(Self {
            artist: dataset.name.clone(),
            song_label: series.label.clone(),
            peak_position: series.peak_position(),
            total_weeks: song.total_weeks.unwrap_or(0),
            first_charted: series.first_date(),
            last_charted: series.last_date(),
            accent: color_for_song(&song.name),
            points: series.points,
            format,
            theme: CardTheme::default(),
        })
    }

    #[must_use]
    pub fn with_theme(mut self, theme: CardTheme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    #[must_use]
    pub fn headline(&self) -> String {
        match self.peak_position {
            Some(1) => "Hit #1".to_owned(),
            Some(peak) => format!("Peaked at #{peak}"),
            None => "Charted".to_owned(),
        }
    }

    /// Lays the card out as draw primitives.
    pub fn compose(&self) -> ChartResult<RenderFrame> {
        let viewport = self.format.viewport();
        let w = f64::from(viewport.width);
        let h = f64::from(viewport.height);
        let margin = w * 0.08;
        let theme = self.theme;

        let mut frame = RenderFrame::new(viewport)
            .with_rect(RectPrimitive::new(0.0, 0.0, w, h, theme.background))
            .with_rect(RectPrimitive::new(0.0, 0.0, w, h * 0.015, self.accent))
            .with_text(TextPrimitive::new(
                self.artist.to_uppercase(),
                margin,
                h * 0.06,
                w * 0.035,
                theme.muted,
                TextHAlign::Left,
            ))
            .with_text(TextPrimitive::new(
                self.song_label.clone(),
                margin,
                h * 0.11,
                w * 0.055,
                theme.foreground,
                TextHAlign::Left,
            ))
            .with_text(TextPrimitive::new(
                self.headline(),
                margin,
                h * 0.19,
                w * 0.04,
                self.accent,
                TextHAlign::Left,
            ));

        let box_top = h * 0.27;
        let box_height = h * 0.14;
        let box_width = (w - margin * 3.0) / 2.0;
        let peak_text = self
            .peak_position
            .map_or_else(|| "-".to_owned(), |peak| format!("#{peak}"));
        let stats = [
            (peak_text, "PEAK POSITION"),
            (self.total_weeks.to_string(), "WEEKS ON CHART"),
        ];
        for (index, (value, caption)) in stats.into_iter().enumerate() {
            let left = margin + index as f64 * (box_width + margin);
            frame.rects.push(
                RectPrimitive::new(left, box_top, box_width, box_height, theme.panel)
                    .with_border(w * 0.002, self.accent.with_alpha(0.5))
                    .with_corner_radius(w * 0.02),
            );
            frame.texts.push(TextPrimitive::new(
                value,
                left + box_width / 2.0,
                box_top + box_height * 0.15,
                w * 0.06,
                theme.foreground,
                TextHAlign::Center,
            ));
            frame.texts.push(TextPrimitive::new(
                caption,
                left + box_width / 2.0,
                box_top + box_height * 0.68,
                w * 0.022,
                theme.muted,
                TextHAlign::Center,
            ));
        }

        self.push_sparkline(&mut frame, margin, h * 0.48, w - margin, h * 0.82)?;

        if let (Some(first), Some(last)) = (self.first_charted, self.last_charted) {
            frame.texts.push(TextPrimitive::new(
                format!("{} to {}", first.format("%b %-d, %Y"), last.format("%b %-d, %Y")),
                margin,
                h * 0.86,
                w * 0.028,
                theme.muted,
                TextHAlign::Left,
            ));
        }
        frame.texts.push(TextPrimitive::new(
            "Chart history",
            w - margin,
            h * 0.93,
            w * 0.022,
            theme.muted,
            TextHAlign::Right,
        ));

        debug!(
            artist = %self.artist,
            song = %self.song_label,
            format = ?self.format,
            lines = frame.lines.len(),
            "composed promo card"
        );
        Ok(frame)
    }

    /// Rank-over-time line, one slot per plotted week, broken at gaps.
    fn push_sparkline(
        &self,
        frame: &mut RenderFrame,
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    ) -> ChartResult<()> {
        frame.rects.push(
            RectPrimitive::new(left, top, right - left, bottom - top, self.theme.panel)
                .with_corner_radius((right - left) * 0.02),
        );
        if self.points.is_empty() {
            return Ok(());
        }

        let inset = (bottom - top) * 0.08;
        let y_scale = LinearScale::new(
            MIN_CHART_POSITION as f64,
            MAX_CHART_POSITION as f64,
            top + inset,
            bottom - inset,
        )?;
        let slots = self.points.len();
        let x_of = |slot: usize| {
            if slots <= 1 {
                (left + right) / 2.0
            } else {
                left + inset + slot as f64 / (slots - 1) as f64 * (right - left - inset * 2.0)
            }
        };

        let stroke = ((right - left) * 0.006).max(1.0);
        let mut previous: Option<(f64, f64)> = None;
        for (slot, point) in self.points.iter().enumerate() {
            let x = x_of(slot);
            let y = y_scale.map(f64::from(point.position))?;
            match previous {
                Some((px, py)) if !point.gap_before => {
                    frame
                        .lines
                        .push(LinePrimitive::new(px, py, x, y, stroke, self.accent));
                }
                _ => {}
            }
            previous = Some((x, y));
        }
        if slots == 1 {
            let (x, y) = (x_of(0), y_scale.map(f64::from(self.points[0].position))?);
            frame.rects.push(
                RectPrimitive::new(
                    x - stroke * 2.0,
                    y - stroke * 2.0,
                    stroke * 4.0,
                    stroke * 4.0,
                    self.accent,
                )
                .with_corner_radius(stroke * 2.0),
            );
        }
        Ok(())
    }
}
