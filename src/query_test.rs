use chrono::NaiveDate;

use crate::common::FlexDate;
use crate::query::*;
use crate::records::Track;

fn track(artist_id: &str, name: &str, popularity: i64) -> Track {
    Track {
        artist_id: artist_id.to_string(),
        name: name.to_string(),
        popularity,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_filter_by_artist_preserves_row_order() {
    let tracks = vec![
        track("a1", "Song1", 80),
        track("a2", "Tide", 72),
        track("a1", "Song2", 40),
    ];
    let mine = filter_by_artist(&tracks, "a1");
    let names: Vec<&str> = mine.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Song1", "Song2"]);
    assert!(filter_by_artist(&tracks, "a9").is_empty());
}

#[test]
fn test_sort_by_key_directions() {
    let mut values = vec![3, 1, 2];
    sort_by_key(&mut values, |v| Some(*v), true, true);
    assert_eq!(values, vec![1, 2, 3]);
    sort_by_key(&mut values, |v| Some(*v), false, true);
    assert_eq!(values, vec![3, 2, 1]);
}

#[test]
fn test_sort_by_key_null_placement() {
    let mut values: Vec<Option<i64>> = vec![Some(2), None, Some(1)];
    sort_by_key(&mut values, |v| *v, true, true);
    assert_eq!(values, vec![Some(1), Some(2), None]);

    let mut values: Vec<Option<i64>> = vec![Some(2), None, Some(1)];
    sort_by_key(&mut values, |v| *v, false, true);
    assert_eq!(values, vec![Some(2), Some(1), None]);

    // Without nulls_last, a missing key sorts as the smallest value.
    let mut values: Vec<Option<i64>> = vec![Some(2), None, Some(1)];
    sort_by_key(&mut values, |v| *v, true, false);
    assert_eq!(values, vec![None, Some(1), Some(2)]);

    let mut values: Vec<Option<i64>> = vec![Some(2), None, Some(1)];
    sort_by_key(&mut values, |v| *v, false, false);
    assert_eq!(values, vec![Some(2), Some(1), None]);
}

#[test]
fn test_sort_by_key_is_stable() {
    let mut tracks = vec![track("a1", "B", 50), track("a1", "A", 50), track("a1", "C", 80)];
    sort_by_key(&mut tracks, |t| Some(t.popularity), false, true);
    let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["C", "B", "A"]);
}

#[test]
fn test_top_n() {
    let tracks = vec![
        track("a1", "Low", 10),
        track("a1", "High", 90),
        track("a1", "Mid", 50),
        track("a1", "AlsoMid", 50),
    ];
    let top = top_n(tracks, |t| t.popularity, 3);
    let names: Vec<&str> = top.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["High", "Mid", "AlsoMid"]);
}

#[test]
fn test_top_n_larger_than_input() {
    let top = top_n(vec![1, 2], |v| *v, 10);
    assert_eq!(top, vec![2, 1]);
}

#[test]
fn test_group_count_orders_by_count_then_first_seen() {
    let values = vec!["pop", "latin", "pop", "rock", "latin", "pop"];
    let counts = group_count(values);
    assert_eq!(counts, vec![("pop", 3), ("latin", 2), ("rock", 1)]);

    // Equal counts: whichever value appeared first wins the tie.
    let values = vec!["b", "a", "b", "a"];
    let counts = group_count(values);
    assert_eq!(counts, vec![("b", 2), ("a", 2)]);
}

#[test]
fn test_bucketize_thresholds() {
    let breakpoints = [(70, "very popular"), (50, "popular"), (30, "moderate")];
    assert_eq!(bucketize(95, &breakpoints, "low"), "very popular");
    assert_eq!(bucketize(70, &breakpoints, "low"), "very popular");
    assert_eq!(bucketize(69, &breakpoints, "low"), "popular");
    assert_eq!(bucketize(50, &breakpoints, "low"), "popular");
    assert_eq!(bucketize(30, &breakpoints, "low"), "moderate");
    assert_eq!(bucketize(29, &breakpoints, "low"), "low");
    assert_eq!(bucketize(0, &breakpoints, "low"), "low");
}

#[test]
fn test_time_buckets_for_calendar_dates() {
    let d = date(2024, 3, 15);
    assert_eq!(d.bucket(TimeGranularity::Year), Some(TimeBucket::Year(2024)));
    assert_eq!(d.bucket(TimeGranularity::Month), Some(TimeBucket::Month(2024, 3)));
    assert_eq!(d.bucket(TimeGranularity::Decade), Some(TimeBucket::Decade(2020)));
    assert_eq!(date(1999, 12, 31).bucket(TimeGranularity::Decade), Some(TimeBucket::Decade(1990)));
}

#[test]
fn test_time_buckets_for_flex_dates() {
    let year_only = FlexDate { year: 2019, month: None, day: None };
    assert_eq!(year_only.bucket(TimeGranularity::Year), Some(TimeBucket::Year(2019)));
    assert_eq!(year_only.bucket(TimeGranularity::Month), None);
    assert_eq!(year_only.bucket(TimeGranularity::Decade), Some(TimeBucket::Decade(2010)));

    let with_month = FlexDate { year: 2020, month: Some(11), day: None };
    assert_eq!(with_month.bucket(TimeGranularity::Month), Some(TimeBucket::Month(2020, 11)));
}

#[test]
fn test_time_bucket_count_is_chronological() {
    let dates = vec![date(2024, 5, 11), date(2023, 11, 20), date(2024, 3, 15)];
    let counts = time_bucket_count(dates.iter(), TimeGranularity::Year);
    assert_eq!(counts, vec![(TimeBucket::Year(2023), 1), (TimeBucket::Year(2024), 2)]);
}

#[test]
fn test_time_bucket_display() {
    assert_eq!(TimeBucket::Year(2024).to_string(), "2024");
    assert_eq!(TimeBucket::Month(2024, 3).to_string(), "2024-03");
    assert_eq!(TimeBucket::Decade(1990).to_string(), "1990s");
}

#[test]
fn test_explode_multi_value_keeps_repeats() {
    let cells = vec!["pop, Latin pop, pop", "latin, reggaeton", " ", ""];
    let values = explode_multi_value(cells.iter().copied(), ',');
    assert_eq!(values, vec!["pop", "Latin pop", "pop", "latin", "reggaeton"]);
}

#[test]
fn test_histogram_bins() {
    let bins = histogram(vec![80, 40], 10);
    assert_eq!(bins, vec![(40, 1), (80, 1)]);

    let bins = histogram(vec![0, 9, 10, 95, 99, 100], 10);
    assert_eq!(bins, vec![(0, 2), (10, 1), (90, 2), (100, 1)]);
}

#[test]
fn test_histogram_empty_input() {
    assert!(histogram(std::iter::empty(), 10).is_empty());
}

#[test]
fn test_mean() {
    assert_eq!(mean(vec![80, 40]), Some(60.0));
    assert_eq!(mean(vec![72, 66, 31]), Some(169.0 / 3.0));
    assert_eq!(mean(std::iter::empty()), None);
}
