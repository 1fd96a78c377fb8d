/// Pure operations over decoded records: filtering, ordering, grouping, bucketing. The page
/// builders compose these; nothing in here touches the cache or does IO, which keeps every
/// operation trivially testable on literal vectors.
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::common::FlexDate;
use crate::records::ArtistScoped;

pub fn filter_by_artist<'a, T: ArtistScoped>(records: &'a [T], artist_id: &str) -> Vec<&'a T> {
    records.iter().filter(|r| r.artist_id() == artist_id).collect()
}

/// Stable sort by an optional key. With `nulls_last`, records whose key is missing collect
/// at the end in both directions; without it, a missing key simply sorts as the smallest
/// value.
pub fn sort_by_key<T, K: Ord>(
    records: &mut [T],
    key: impl Fn(&T) -> Option<K>,
    ascending: bool,
    nulls_last: bool,
) {
    records.sort_by(|a, b| {
        let ordering = match (key(a), key(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => {
                if nulls_last {
                    return Ordering::Greater;
                }
                Ordering::Less
            }
            (Some(_), None) => {
                if nulls_last {
                    return Ordering::Less;
                }
                Ordering::Greater
            }
            (Some(ka), Some(kb)) => ka.cmp(&kb),
        };
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

/// The `n` records with the largest keys, in descending key order. Ties keep their input
/// order.
pub fn top_n<T, K: Ord>(mut records: Vec<T>, key: impl Fn(&T) -> K, n: usize) -> Vec<T> {
    records.sort_by(|a, b| key(b).cmp(&key(a)));
    records.truncate(n);
    records
}

/// Count occurrences of each distinct value. Output is ordered by descending count; equal
/// counts keep first-seen order, so the result is deterministic for a given input order.
pub fn group_count<I, V>(values: I) -> Vec<(V, usize)>
where
    I: IntoIterator<Item = V>,
    V: Eq + Hash + Clone,
{
    let mut counts: HashMap<V, usize> = HashMap::new();
    let mut order: Vec<V> = Vec::new();
    for v in values {
        match counts.get_mut(&v) {
            Some(c) => *c += 1,
            None => {
                counts.insert(v.clone(), 1);
                order.push(v);
            }
        }
    }
    let mut rv: Vec<(V, usize)> = order.into_iter().map(|v| {
        let count = counts[&v];
        (v, count)
    }).collect();
    rv.sort_by(|a, b| b.1.cmp(&a.1));
    rv
}

/// Label a value against descending thresholds: the first breakpoint whose threshold the
/// value meets wins, else the default label. Breakpoints must be ordered highest first.
pub fn bucketize<'a>(value: i64, breakpoints: &[(i64, &'a str)], default_label: &'a str) -> &'a str {
    for (threshold, label) in breakpoints {
        if value >= *threshold {
            return label;
        }
    }
    default_label
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeGranularity {
    Year,
    Month,
    Decade,
}

/// A calendar bucket at one of the supported granularities. Ordering is chronological
/// within a granularity; buckets of mixed granularities are never compared in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeBucket {
    Year(i32),
    Month(i32, u32),
    Decade(i32),
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::Year(year) => write!(f, "{year}"),
            TimeBucket::Month(year, month) => write!(f, "{year:04}-{month:02}"),
            TimeBucket::Decade(decade) => write!(f, "{decade}s"),
        }
    }
}

impl Serialize for TimeBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Dates that can be assigned to a `TimeBucket`. Returns None when the date is not precise
/// enough for the requested granularity.
pub trait Bucketable {
    fn bucket(&self, granularity: TimeGranularity) -> Option<TimeBucket>;
}

impl Bucketable for NaiveDate {
    fn bucket(&self, granularity: TimeGranularity) -> Option<TimeBucket> {
        match granularity {
            TimeGranularity::Year => Some(TimeBucket::Year(self.year())),
            TimeGranularity::Month => Some(TimeBucket::Month(self.year(), self.month())),
            TimeGranularity::Decade => Some(TimeBucket::Decade(decade_of(self.year()))),
        }
    }
}

impl Bucketable for FlexDate {
    fn bucket(&self, granularity: TimeGranularity) -> Option<TimeBucket> {
        match granularity {
            TimeGranularity::Year => Some(TimeBucket::Year(self.year)),
            TimeGranularity::Month => self.month.map(|m| TimeBucket::Month(self.year, m)),
            TimeGranularity::Decade => Some(TimeBucket::Decade(decade_of(self.year))),
        }
    }
}

fn decade_of(year: i32) -> i32 {
    year - year.rem_euclid(10)
}

/// Count dates per calendar bucket, in chronological order. Dates too imprecise for the
/// granularity are skipped; buckets with no dates do not appear.
pub fn time_bucket_count<'a, T, I>(dates: I, granularity: TimeGranularity) -> Vec<(TimeBucket, usize)>
where
    T: Bucketable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut counts: HashMap<TimeBucket, usize> = HashMap::new();
    for date in dates {
        if let Some(bucket) = date.bucket(granularity) {
            *counts.entry(bucket).or_insert(0) += 1;
        }
    }
    let mut rv: Vec<(TimeBucket, usize)> = counts.into_iter().collect();
    rv.sort_by_key(|(bucket, _)| *bucket);
    rv
}

/// Split delimited cells into their individual values, trimmed, empties dropped. Repeats
/// are kept; this feeds `group_count`, which wants to see every occurrence.
pub fn explode_multi_value<'a, I>(values: I, separator: char) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rv = Vec::new();
    for value in values {
        for part in value.split(separator) {
            let part = part.trim();
            if !part.is_empty() {
                rv.push(part.to_string());
            }
        }
    }
    rv
}

/// Fixed-width histogram keyed by each bin's lower bound, ascending. Empty bins are absent.
/// `bin_width` must be positive; the configuration layer enforces that.
pub fn histogram<I>(values: I, bin_width: i64) -> Vec<(i64, usize)>
where
    I: IntoIterator<Item = i64>,
{
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for v in values {
        let lower = v.div_euclid(bin_width) * bin_width;
        *counts.entry(lower).or_insert(0) += 1;
    }
    let mut rv: Vec<(i64, usize)> = counts.into_iter().collect();
    rv.sort_by_key(|(lower, _)| *lower);
    rv
}

pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = i64>,
{
    let mut sum: i64 = 0;
    let mut count: usize = 0;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}
