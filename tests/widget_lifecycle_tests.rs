use chart_history::api::{DataSource, StaticSource};
use chart_history::core::{ArtistDataset, ChartEntry, DateWindow, Song};
use chart_history::interaction::WheelInput;
use chart_history::render::{NullRenderer, Renderer, TextSummaryRenderer};
use chart_history::{ChartError, ChartWidget, WidgetConfig};

fn dataset(artist: &str, song: &str, dates: &[&str]) -> ArtistDataset {
    let history = dates
        .iter()
        .enumerate()
        .map(|(i, date)| ChartEntry::new(*date, 20 - i as i64, i as u32 + 1))
        .collect();
    ArtistDataset::new(artist, vec![Song::from_history(song, Vec::new(), history)])
}

fn widget(artist: &str) -> ChartWidget<NullRenderer> {
    ChartWidget::new(NullRenderer::default(), WidgetConfig::new(artist)).expect("widget")
}

#[test]
fn load_from_source_normalizes_and_renders() {
    let source = StaticSource::new().with_dataset(dataset(
        "Band Name",
        "Single",
        &["2024-01-06", "2024-01-13"],
    ));
    let mut widget = widget("band name");

    widget.load_from(&source, "nonce").expect("load");
    assert_eq!(widget.axis().len(), 2);
    assert_eq!(widget.series().len(), 1);
    assert_eq!(widget.renderer().render_count, 1);
    assert!(widget.status_message().is_none());
}

#[test]
fn stale_response_is_discarded() {
    let mut widget = widget("Artist");
    let first = widget.begin_load().expect("first ticket");
    let second = widget.begin_load().expect("second ticket");

    let newer = dataset("Artist", "New", &["2024-03-02"]);
    widget.complete_load(second, Ok(newer)).expect("latest applies");

    let older = dataset("Artist", "Old", &["2023-01-07", "2023-01-14"]);
    let err = widget
        .complete_load(first, Ok(older))
        .expect_err("stale ticket");
    assert!(matches!(
        err,
        ChartError::StaleResponse {
            ticket: 1,
            latest: 2
        }
    ));
    assert_eq!(widget.series()[0].song_name, "New");
}

#[test]
fn out_of_order_completion_keeps_latest_request() {
    let mut widget = widget("Artist");
    let first = widget.begin_load().expect("first ticket");
    let second = widget.begin_load().expect("second ticket");

    assert!(widget
        .complete_load(first, Ok(dataset("Artist", "Old", &["2023-01-07"])))
        .is_err());
    assert!(widget.dataset().is_none());

    widget
        .complete_load(second, Ok(dataset("Artist", "New", &["2024-03-02"])))
        .expect("latest applies");
    assert_eq!(widget.series()[0].song_name, "New");
}

#[test]
fn failed_load_sets_status_and_keeps_previous_data() {
    let mut widget = widget("Artist");
    widget.set_dataset(dataset("Artist", "Kept", &["2024-01-06"])).expect("dataset");

    let ticket = widget.begin_load().expect("ticket");
    let err = widget
        .complete_load(ticket, Err(ChartError::Fetch("timeout".to_owned())))
        .expect_err("failure surfaces");
    assert!(matches!(err, ChartError::Fetch(_)));
    assert_eq!(
        widget.status_message(),
        Some("Unable to load chart data for Artist. Please reload to try again.")
    );
    assert_eq!(widget.series()[0].song_name, "Kept");

    let retry = widget.begin_load().expect("retry");
    widget
        .complete_load(retry, Ok(dataset("Artist", "Fresh", &["2024-01-06"])))
        .expect("retry applies");
    assert!(widget.status_message().is_none());
}

#[test]
fn rejected_source_reports_server_message() {
    let mut widget = widget("Unknown");
    let err = widget
        .load_from(&StaticSource::new(), "nonce")
        .expect_err("missing artist");
    assert!(matches!(err, ChartError::Rejected(_)));
    assert!(widget.status_message().is_some());
    assert_eq!(widget.renderer().render_count, 1, "the failure is drawn");
}

#[test]
fn failed_load_is_shown_by_text_fallback() {
    let mut widget = ChartWidget::new(
        TextSummaryRenderer::in_memory(),
        WidgetConfig::new("Nobody"),
    )
    .expect("widget");
    assert!(widget.load_from(&StaticSource::new(), "nonce").is_err());

    assert_eq!(widget.renderer().frames_written(), 1);
    assert_eq!(
        widget.renderer().contents(),
        "Unable to load chart data for Nobody. Please reload to try again.\n\
         No chart data available for Nobody.\n"
    );
    assert_eq!(
        widget.chart_view().status_message.as_deref(),
        widget.status_message()
    );
}

#[test]
fn set_dataset_after_destroy_is_rejected() {
    let mut widget = widget("Artist");
    widget.destroy();
    assert!(matches!(
        widget.set_dataset(dataset("Artist", "Late", &["2024-01-06"])),
        Err(ChartError::WidgetDestroyed)
    ));
    assert!(widget.dataset().is_none());
}

#[test]
fn new_dataset_resets_window() {
    let dates: Vec<String> = (1..=9).map(|m| format!("2024-0{m}-01")).collect();
    let refs: Vec<&str> = dates.iter().map(String::as_str).collect();
    let config = WidgetConfig::new("Artist").with_initial_visible_count(3);
    let mut widget = ChartWidget::new(NullRenderer::default(), config).expect("widget");

    widget.set_dataset(dataset("Artist", "Song", &refs)).expect("dataset");
    widget.set_window(5, 3).expect("move window");
    widget.set_dataset(dataset("Artist", "Song", &refs)).expect("dataset");
    assert_eq!(widget.window(), DateWindow::new(0, 3));
}

#[test]
fn destroy_releases_renderer_and_blocks_further_use() {
    let mut widget = widget("Artist");
    widget
        .set_dataset(dataset("Artist", "Song", &["2024-01-06", "2024-01-13"]))
        .expect("dataset");
    let pending = widget.begin_load().expect("ticket");

    widget.destroy();
    assert!(!widget.is_mounted());
    assert!(widget.renderer().released);
    assert!(widget.dataset().is_none());

    assert!(matches!(
        widget.on_wheel(WheelInput::zoom(1.0)),
        Err(ChartError::WidgetDestroyed)
    ));
    assert!(matches!(widget.render(), Err(ChartError::WidgetDestroyed)));
    assert!(matches!(
        widget.complete_load(pending, Ok(dataset("Artist", "Late", &["2024-02-03"]))),
        Err(ChartError::WidgetDestroyed)
    ));

    widget.destroy();
    let renderer = widget.into_renderer();
    assert!(renderer.released);
    assert_eq!(renderer.render_count, 0);
}

#[test]
fn widgets_do_not_share_state() {
    let mut left = widget("Left");
    let mut right = widget("Right");
    left.set_dataset(dataset("Left", "A", &["2024-01-06", "2024-01-13", "2024-01-20"]))
        .expect("dataset");
    right.set_dataset(dataset("Right", "B", &["2020-05-02"])).expect("dataset");

    left.set_window(1, 2).expect("move left");
    right.destroy();

    assert_eq!(left.window(), DateWindow::new(1, 2));
    assert!(left.is_mounted());
    left.render().expect("left still renders");
    assert_eq!(left.renderer().render_count, 2);
}

#[test]
fn text_fallback_describes_visible_window() {
    let config = WidgetConfig::new("Artist").with_initial_visible_count(2);
    let mut widget = ChartWidget::new(TextSummaryRenderer::in_memory(), config).expect("widget");
    widget
        .set_dataset(dataset(
            "Artist",
            "Song",
            &["2024-01-06", "2024-01-13", "2024-01-20"],
        ))
        .expect("dataset");
    widget.render().expect("render");

    let text = widget.renderer().contents();
    assert!(text.contains(
        "Chart history for Artist (2024-01-06 to 2024-01-13, 2 of 3 chart weeks)"
    ));
    assert!(text.contains("  Song - peak #18, 3 weeks"));
}

#[test]
fn text_fallback_reports_missing_data() {
    let mut widget = ChartWidget::new(
        TextSummaryRenderer::in_memory(),
        WidgetConfig::new("Silent"),
    )
    .expect("widget");
    widget.render().expect("render");
    assert_eq!(
        widget.renderer().contents(),
        "No chart data available for Silent.\n"
    );
}

#[test]
fn boxed_renderer_is_chosen_at_runtime() {
    let renderer: Box<dyn Renderer> = Box::new(TextSummaryRenderer::in_memory());
    let mut widget = ChartWidget::new(renderer, WidgetConfig::new("Artist")).expect("widget");
    assert!(!widget.renderer().is_graphical());
    widget.render().expect("render");
}

struct FailingSource;

impl DataSource for FailingSource {
    fn fetch(
        &self,
        _request: &chart_history::api::ArtistChartsRequest,
    ) -> chart_history::ChartResult<ArtistDataset> {
        Err(ChartError::Fetch("connection refused".to_owned()))
    }
}

#[test]
fn custom_source_failure_is_recoverable() {
    let mut widget = widget("Artist");
    assert!(widget.load_from(&FailingSource, "n").is_err());
    assert!(widget.is_mounted());
    let source = StaticSource::new().with_dataset(dataset("Artist", "Song", &["2024-01-06"]));
    widget.load_from(&source, "n").expect("second attempt");
    assert!(widget.status_message().is_none());
}
