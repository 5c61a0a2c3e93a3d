use approx::assert_relative_eq;
use chart_history::core::{
    DateWindow, ScrollbarConfig, ScrollbarSync, percentage_to_start_index,
    start_index_to_percentage, thumb_fraction,
};

#[test]
fn thumb_fraction_tracks_visible_share() {
    assert_relative_eq!(thumb_fraction(10, 40, 0.05), 0.25);
    assert_relative_eq!(thumb_fraction(40, 40, 0.05), 1.0);
    assert_relative_eq!(thumb_fraction(1, 1000, 0.05), 0.05);
    assert_relative_eq!(thumb_fraction(0, 0, 0.05), 1.0);
}

#[test]
fn percentage_maps_onto_start_index() {
    assert_eq!(percentage_to_start_index(0.0, 10, 30), 0);
    assert_eq!(percentage_to_start_index(50.0, 10, 30), 10);
    assert_eq!(percentage_to_start_index(100.0, 10, 30), 20);
    assert_eq!(percentage_to_start_index(250.0, 10, 30), 20);
    assert_eq!(percentage_to_start_index(-5.0, 10, 30), 0);
    assert_eq!(percentage_to_start_index(f64::NAN, 10, 30), 0);
}

#[test]
fn full_window_has_no_travel() {
    assert_eq!(percentage_to_start_index(75.0, 30, 30), 0);
    assert_relative_eq!(start_index_to_percentage(0, 30, 30), 0.0);
    assert_relative_eq!(start_index_to_percentage(5, 10, 0), 0.0);
}

#[test]
fn start_index_maps_back_to_percentage() {
    assert_relative_eq!(start_index_to_percentage(0, 10, 30), 0.0);
    assert_relative_eq!(start_index_to_percentage(5, 10, 30), 25.0);
    assert_relative_eq!(start_index_to_percentage(20, 10, 30), 100.0);
    assert_relative_eq!(start_index_to_percentage(99, 10, 30), 100.0);
}

#[test]
fn thumb_geometry_follows_window() {
    let sync = ScrollbarSync::new(ScrollbarConfig::default(), 800.0).expect("sync");
    let thumb = sync.thumb_geometry(DateWindow::new(10, 10), 20);
    assert_relative_eq!(thumb.width_px, 400.0);
    assert_relative_eq!(thumb.travel_px(), 400.0);
    assert_relative_eq!(thumb.offset_px, 400.0);
    assert_relative_eq!(thumb.percentage(), 100.0);
    assert!(thumb.contains(600.0));
    assert!(!thumb.contains(100.0));
}

#[test]
fn drag_moves_relative_to_origin_and_clamps() {
    let mut sync = ScrollbarSync::new(ScrollbarConfig::default(), 800.0).expect("sync");
    let window = DateWindow::new(0, 10);
    sync.begin_drag(100.0, window, 20).expect("begin drag");
    assert!(sync.is_dragging());

    let halfway = sync.drag_move(300.0).expect("move").expect("dragging");
    assert_relative_eq!(halfway, 50.0);

    let past_end = sync.drag_move(5_000.0).expect("move").expect("dragging");
    assert_relative_eq!(past_end, 100.0);

    let before_start = sync.drag_move(-5_000.0).expect("move").expect("dragging");
    assert_relative_eq!(before_start, 0.0);

    assert!(sync.end_drag());
    assert!(!sync.end_drag());
    assert_eq!(sync.drag_move(300.0).expect("idle move"), None);
}

#[test]
fn track_click_centres_thumb_on_pointer() {
    let sync = ScrollbarSync::new(ScrollbarConfig::default(), 800.0).expect("sync");
    let window = DateWindow::new(0, 10);
    assert_relative_eq!(sync.click_track(400.0, window, 20).expect("click"), 50.0);
    assert_relative_eq!(sync.click_track(790.0, window, 20).expect("click"), 100.0);
    assert_relative_eq!(sync.click_track(10.0, window, 20).expect("click"), 0.0);
}

#[test]
fn resize_cancels_drag() {
    let mut sync = ScrollbarSync::new(ScrollbarConfig::default(), 800.0).expect("sync");
    sync.begin_drag(10.0, DateWindow::new(0, 5), 20).expect("begin drag");
    sync.set_track_width(400.0).expect("resize");
    assert!(!sync.is_dragging());
    assert_relative_eq!(sync.track_width_px(), 400.0);
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(ScrollbarSync::new(ScrollbarConfig::default(), 0.0).is_err());
    assert!(ScrollbarSync::new(ScrollbarConfig::default(), f64::NAN).is_err());
    let bad_config = ScrollbarConfig {
        min_thumb_fraction: 0.0,
        ..ScrollbarConfig::default()
    };
    assert!(ScrollbarSync::new(bad_config, 800.0).is_err());

    let mut sync = ScrollbarSync::new(ScrollbarConfig::default(), 800.0).expect("sync");
    assert!(sync.begin_drag(f64::NAN, DateWindow::new(0, 5), 20).is_err());
    assert!(sync.click_track(f64::INFINITY, DateWindow::new(0, 5), 20).is_err());
}
