use chart_history::api::build_render_frame;
use chart_history::core::{ArtistDataset, ChartEntry, ScrollbarConfig, Song, Viewport};
use chart_history::render::{NullRenderer, Renderer, color_for_song};
use chart_history::{ChartError, ChartWidget, WidgetConfig};
use chrono::NaiveDate;

fn d(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("date")
}

fn song(name: &str, entries: &[(&str, i64)]) -> Song {
    Song::from_history(
        name,
        Vec::new(),
        entries
            .iter()
            .enumerate()
            .map(|(i, (date, position))| ChartEntry::new(*date, *position, i as u32 + 1))
            .collect(),
    )
}

fn loaded_widget(songs: Vec<Song>, visible: usize) -> ChartWidget<NullRenderer> {
    let config = WidgetConfig::new("Artist").with_initial_visible_count(visible);
    let mut widget = ChartWidget::new(NullRenderer::default(), config).expect("widget");
    widget.set_dataset(ArtistDataset::new("Artist", songs)).expect("dataset");
    widget
}

#[test]
fn gap_marker_breaks_line_at_dropped_week() {
    let widget = loaded_widget(
        vec![song(
            "Song",
            &[("2024-01-06", 30), ("2024-01-13", 150), ("2024-01-20", 25)],
        )],
        10,
    );
    let view = widget.chart_view();
    let points: Vec<(NaiveDate, Option<u8>)> = view.datasets[0]
        .points
        .iter()
        .map(|p| (p.date, p.position))
        .collect();
    assert_eq!(
        points,
        vec![
            (d("2024-01-06"), Some(30)),
            (d("2024-01-07"), None),
            (d("2024-01-20"), Some(25)),
        ]
    );
}

#[test]
fn view_covers_only_the_window() {
    let entries = [
        ("2024-01-06", 9),
        ("2024-01-13", 8),
        ("2024-01-20", 7),
        ("2024-01-27", 6),
    ];
    let mut widget = loaded_widget(vec![song("Song", &entries)], 2);
    widget.set_window(1, 2).expect("window");

    let view = widget.chart_view();
    assert_eq!(view.x_range, Some((d("2024-01-13"), d("2024-01-20"))));
    assert_eq!(view.labels, vec![d("2024-01-13"), d("2024-01-20")]);
    assert_eq!(view.y_range, (1, 100));
    let plotted: Vec<(NaiveDate, u8)> = view.datasets[0].plotted().collect();
    assert_eq!(plotted, vec![(d("2024-01-13"), 8), (d("2024-01-20"), 7)]);
}

#[test]
fn songs_absent_from_window_keep_their_legend_entry() {
    let widget = loaded_widget(
        vec![
            song("Early", &[("2024-01-06", 5)]),
            song("Late", &[("2025-06-07", 5)]),
        ],
        1,
    );
    let view = widget.chart_view();
    assert_eq!(view.datasets.len(), 2);
    assert_eq!(view.datasets[0].points.len(), 1);
    assert!(view.datasets[1].points.is_empty());
    assert_eq!(view.plotted_point_count(), 1);
}

#[test]
fn dataset_colors_come_from_song_name() {
    let widget = loaded_widget(
        vec![song("Alpha", &[("2024-01-06", 5)]), song("Beta", &[("2024-01-06", 6)])],
        10,
    );
    let view = widget.chart_view();
    assert_eq!(view.datasets[0].color, color_for_song("Alpha"));
    assert_eq!(view.datasets[1].color, color_for_song("Beta"));
    assert_eq!(view.datasets[0].peak_position, Some(5));
}

#[test]
fn repeated_renders_produce_identical_views() {
    let mut widget = loaded_widget(
        vec![song("Song", &[("2024-01-06", 5), ("2024-01-13", 4)])],
        10,
    );
    let first = widget.chart_view();
    widget.render().expect("render");
    widget.render().expect("render again");
    assert_eq!(first, widget.chart_view());
    assert_eq!(widget.renderer().render_count, 2);
}

#[test]
fn graphical_frame_breaks_lines_at_gaps() {
    let widget = loaded_widget(
        vec![song(
            "Song",
            &[
                ("2024-01-06", 30),
                ("2024-01-13", 150),
                ("2024-01-20", 25),
                ("2024-01-27", 20),
            ],
        )],
        10,
    );
    let view = widget.chart_view();
    let frame = build_render_frame(
        &view,
        Viewport::new(800, 400),
        widget.thumb_geometry(),
        ScrollbarConfig::default(),
    )
    .expect("frame");
    frame.validate().expect("valid frame");

    let song_color = color_for_song("Song");
    let song_segments = frame
        .lines
        .iter()
        .filter(|line| line.color == song_color)
        .count();
    assert_eq!(song_segments, 1, "only 01-20 -> 01-27 is connected");

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    assert_eq!(renderer.last_dataset_count, 1);
}

#[test]
fn rank_one_is_drawn_above_rank_hundred() {
    let widget = loaded_widget(
        vec![song("Song", &[("2024-01-06", 1), ("2024-01-13", 100)])],
        10,
    );
    let frame = build_render_frame(
        &widget.chart_view(),
        Viewport::new(800, 400),
        widget.thumb_geometry(),
        ScrollbarConfig::default(),
    )
    .expect("frame");
    let song_color = color_for_song("Song");
    let segment = frame
        .lines
        .iter()
        .find(|line| line.color == song_color)
        .expect("song segment");
    assert!(segment.y1 < segment.y2);
    assert!(segment.x1 < segment.x2);
}

#[test]
fn empty_view_draws_placeholder_text() {
    let widget = loaded_widget(Vec::new(), 10);
    let frame = build_render_frame(
        &widget.chart_view(),
        Viewport::new(800, 400),
        widget.thumb_geometry(),
        ScrollbarConfig::default(),
    )
    .expect("frame");
    assert!(frame
        .texts
        .iter()
        .any(|text| text.text == "No chart data available for Artist"));
}

#[test]
fn tiny_viewport_is_rejected() {
    let widget = loaded_widget(vec![song("Song", &[("2024-01-06", 1)])], 10);
    let result = build_render_frame(
        &widget.chart_view(),
        Viewport::new(30, 30),
        widget.thumb_geometry(),
        ScrollbarConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn crowded_legend_is_capped_with_overflow_marker() {
    let songs: Vec<Song> = (0..120)
        .map(|i| song(&format!("Song {i}"), &[("2024-01-06", 1 + i % 100)]))
        .collect();
    let mut widget = loaded_widget(songs, 10);
    widget.render().expect("render at default viewport");
    assert_eq!(widget.renderer().render_count, 1);

    let frame = build_render_frame(
        &widget.chart_view(),
        Viewport::new(800, 400),
        widget.thumb_geometry(),
        ScrollbarConfig::default(),
    )
    .expect("frame");
    let legend_labels = frame
        .texts
        .iter()
        .filter(|t| t.text.starts_with("Song "))
        .count();
    let marker = frame
        .texts
        .iter()
        .find(|t| t.text.starts_with('+') && t.text.ends_with(" more"))
        .expect("overflow marker");
    let hidden: usize = marker.text[1..marker.text.len() - " more".len()]
        .parse()
        .expect("hidden count");

    assert!(legend_labels > 0 && legend_labels < 120);
    assert_eq!(legend_labels + hidden, 120);
    assert!(marker.y < 400.0 * 0.3);
    // rank grid still gets drawn below the legend
    assert!(frame.texts.iter().any(|t| t.text == "#100"));
}

#[test]
fn failed_load_replaces_placeholder_text() {
    let mut widget = ChartWidget::new(NullRenderer::default(), WidgetConfig::new("Nobody"))
        .expect("widget");
    let ticket = widget.begin_load().expect("ticket");
    let err = widget
        .complete_load(ticket, Err(ChartError::Fetch("timeout".to_owned())))
        .expect_err("fetch error surfaces");
    assert!(matches!(err, ChartError::Fetch(_)));
    assert_eq!(widget.renderer().render_count, 1);

    let frame = build_render_frame(
        &widget.chart_view(),
        Viewport::new(800, 400),
        widget.thumb_geometry(),
        ScrollbarConfig::default(),
    )
    .expect("frame");
    let texts: Vec<&str> = frame.texts.iter().map(|t| t.text.as_str()).collect();
    assert!(texts.contains(&"Unable to load chart data for Nobody. Please reload to try again."));
    assert!(!texts.iter().any(|t| t.starts_with("No chart data")));
}

#[test]
fn failed_reload_draws_banner_over_previous_data() {
    let mut widget = loaded_widget(vec![song("Song", &[("2024-01-06", 4)])], 10);
    let ticket = widget.begin_load().expect("ticket");
    assert!(
        widget
            .complete_load(ticket, Err(ChartError::Fetch("timeout".to_owned())))
            .is_err()
    );

    let frame = build_render_frame(
        &widget.chart_view(),
        Viewport::new(800, 400),
        widget.thumb_geometry(),
        ScrollbarConfig::default(),
    )
    .expect("frame");
    assert!(frame.texts.iter().any(|t| t.text.starts_with("Unable to load chart data")));
    assert!(frame.rects.iter().any(|r| r.border_width > 0.0));
    assert_eq!(frame.view.as_ref().map(|v| v.datasets.len()), Some(1));
}
