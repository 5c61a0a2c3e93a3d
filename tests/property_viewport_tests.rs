use chart_history::core::{
    ArtistDataset, ChartEntry, Song, UniqueDateAxis, ViewportController,
    percentage_to_start_index, start_index_to_percentage,
};
use chart_history::interaction::WheelInput;
use chart_history::render::NullRenderer;
use chart_history::{ChartWidget, WidgetConfig};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    SetWindow(usize, usize),
    Zoom(f64),
    Pan(f64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..300, 0usize..300).prop_map(|(s, v)| Op::SetWindow(s, v)),
        (0.1f64..4.0).prop_map(Op::Zoom),
        (-2.0f64..2.0).prop_map(Op::Pan),
    ]
}

fn weekly_axis(count: usize) -> UniqueDateAxis {
    let first = NaiveDate::from_ymd_opt(2022, 1, 1).expect("date");
    UniqueDateAxis::from_dates((0..count as i64).map(|i| first + Duration::weeks(i)))
}

proptest! {
    #[test]
    fn window_stays_inside_axis_under_any_navigation(
        total in 0usize..120,
        initial in 1usize..40,
        ops in prop::collection::vec(op_strategy(), 0..40)
    ) {
        let mut controller = ViewportController::new(weekly_axis(total), initial);
        for op in ops {
            match op {
                Op::SetWindow(start, visible) => {
                    controller.set_window(start, visible);
                }
                Op::Zoom(factor) => {
                    controller.zoom(factor, None).expect("finite zoom");
                }
                Op::Pan(delta) => {
                    controller.pan(delta).expect("finite pan");
                }
            }

            let window = controller.window();
            prop_assert!(window.end_index() <= total);
            if total == 0 {
                prop_assert_eq!(window.visible_count, 0);
                prop_assert!(controller.window_bounds().is_none());
            } else {
                prop_assert!(window.visible_count >= 1);
                let (start, end) = controller.window_bounds().expect("bounds");
                prop_assert!(start <= end);
                prop_assert_eq!(controller.visible_dates().len(), window.visible_count);
            }
        }
    }

    #[test]
    fn scrollbar_percentage_round_trips_within_one_step(
        total in 2usize..500,
        visible in 1usize..500,
        percentage in 0.0f64..=100.0
    ) {
        prop_assume!(visible < total);
        let max_start = total - visible;
        let start = percentage_to_start_index(percentage, visible, total);
        prop_assert!(start <= max_start);

        let back = start_index_to_percentage(start, visible, total);
        let step = 100.0 / max_start as f64;
        prop_assert!((back - percentage).abs() <= step / 2.0 + 1e-9);
        prop_assert_eq!(percentage_to_start_index(back, visible, total), start);
    }

    #[test]
    fn widget_wheel_sequences_keep_thumb_on_track(
        weeks in 1i64..80,
        deltas in prop::collection::vec((-300.0f64..300.0, any::<bool>()), 0..30)
    ) {
        let first = NaiveDate::from_ymd_opt(2023, 1, 7).expect("date");
        let history = (0..weeks)
            .map(|i| {
                let date = (first + Duration::weeks(i)).to_string();
                ChartEntry::new(date, 1 + i % 100, i as u32 + 1)
            })
            .collect();
        let mut widget = ChartWidget::new(NullRenderer::default(), WidgetConfig::new("Prop"))
            .expect("widget");
        let song = Song::from_history("S", Vec::new(), history);
        widget.set_dataset(ArtistDataset::new("Prop", vec![song])).expect("dataset");

        for (delta, pan) in deltas {
            let input = if pan { WheelInput::pan(delta) } else { WheelInput::zoom(delta) };
            widget.on_wheel(input).expect("wheel");
            let thumb = widget.thumb_geometry();
            prop_assert!(thumb.offset_px >= 0.0);
            prop_assert!(thumb.offset_px + thumb.width_px <= thumb.track_width_px + 1e-9);
            prop_assert!((0.0..=100.0).contains(&thumb.percentage()));
        }
    }
}
