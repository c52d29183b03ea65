//! Monthly trend buckets and chart series transforms.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::engine::summary::{group_by, summarize};
use crate::model::HospRecord;

/// One year-month bucket of averaged rates, ready for chart rendering.
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub year_month: String,
    pub date: Option<NaiveDate>,
    pub formatted_date: Option<String>,
    /// Number of records in the bucket that carried a rate.
    pub count: usize,
    pub avg_rate: f64,
    pub max_rate: f64,
    pub min_rate: f64,
}

/// An `(x, y)` chart point: epoch milliseconds against average rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: i64,
    pub y: f64,
}

/// Buckets records by year-month and averages each bucket's rates.
///
/// The result is sorted by date, null-dated buckets first. Callers apply
/// any record filtering before this step.
pub fn trends_over_time(records: &[HospRecord]) -> Vec<TrendPoint> {
    let groups = group_by(records, |r| r.year_month.as_deref());

    let mut points: Vec<TrendPoint> = groups
        .into_iter()
        .map(|(year_month, group)| {
            let stats = summarize(group.iter().copied());
            // date and display form are uniform within a bucket
            let first = group[0];

            TrendPoint {
                year_month,
                date: first.date,
                formatted_date: first.formatted_date.clone(),
                count: stats.count,
                avg_rate: stats.avg_rate,
                max_rate: stats.max_rate,
                min_rate: stats.min_rate,
            }
        })
        .collect();

    // null-dated buckets all sort as MIN; tie-break on the raw bucket so
    // the order does not depend on hash-map iteration
    points.sort_by(|a, b| {
        let key = |p: &TrendPoint| p.date.unwrap_or(NaiveDate::MIN);
        key(a).cmp(&key(b)).then_with(|| a.year_month.cmp(&b.year_month))
    });
    points
}

/// Maps trend points to chart coordinates, silently dropping points whose
/// date is null. Relative order is preserved.
pub fn to_series(points: &[TrendPoint]) -> Vec<SeriesPoint> {
    points
        .iter()
        .filter_map(|p| {
            p.date.map(|d| SeriesPoint {
                x: d.and_time(NaiveTime::MIN).and_utc().timestamp_millis(),
                y: p.avg_rate,
            })
        })
        .collect()
}

/// Returns the last `n` points in input order, or all of them when the
/// input is shorter. No re-sort: callers pre-sort by time.
pub fn recent_window<T>(points: &[T], n: usize) -> &[T] {
    let start = points.len().saturating_sub(n);
    &points[start..]
}
