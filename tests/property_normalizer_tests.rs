use chart_history::core::{
    ArtistDataset, ChartEntry, GapPolicy, Song, normalize_dataset, normalize_song,
};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn entries_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..400, -20i64..140), 0..60)
}

fn song_from(name: &str, raw: &[(i64, i64)]) -> Song {
    let first = NaiveDate::from_ymd_opt(2020, 1, 4).expect("date");
    Song::from_history(
        name,
        Vec::new(),
        raw.iter()
            .enumerate()
            .map(|(i, (week, position))| {
                let date = first + Duration::weeks(*week);
                ChartEntry::new(date.to_string(), *position, i as u32 + 1)
            })
            .collect(),
    )
}

proptest! {
    #[test]
    fn series_is_sorted_unique_and_in_range(
        raw in entries_strategy(),
        max_gap_weeks in 1u32..60
    ) {
        let song = song_from("Song", &raw);
        let series = normalize_song(&song, GapPolicy::new(max_gap_weeks));

        prop_assert!(series.points.len() <= raw.len());
        prop_assert!(series.points.windows(2).all(|w| w[0].date < w[1].date));
        prop_assert!(series.points.iter().all(|p| (1..=100).contains(&p.position)));
        prop_assert!(series.points.first().is_none_or(|p| !p.gap_before));
        prop_assert_eq!(series.points.len() + series.dropped, raw.len());
    }

    #[test]
    fn long_absences_always_break_the_line(
        raw in entries_strategy(),
        max_gap_weeks in 1u32..60
    ) {
        let policy = GapPolicy::new(max_gap_weeks);
        let series = normalize_song(&song_from("Song", &raw), policy);
        for pair in series.points.windows(2) {
            if policy.breaks_between(pair[0].date, pair[1].date) {
                prop_assert!(pair[1].gap_before);
            }
        }
    }

    #[test]
    fn axis_is_strictly_increasing_union_of_series_dates(
        songs in prop::collection::vec(entries_strategy(), 0..6)
    ) {
        let dataset = ArtistDataset::new(
            "Artist",
            songs
                .iter()
                .enumerate()
                .map(|(i, raw)| song_from(&format!("Song {i}"), raw))
                .collect(),
        );
        let normalized = normalize_dataset(&dataset, GapPolicy::default());
        let dates = normalized.axis.dates();

        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        for series in &normalized.series {
            for point in &series.points {
                prop_assert!(normalized.axis.index_of(point.date).is_some());
            }
        }
        let total: usize = normalized.series.iter().map(|s| s.points.len()).sum();
        prop_assert!(dates.len() <= total);
    }
}
