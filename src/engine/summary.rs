//! Grouping and per-group summary statistics.

use serde::Serialize;
use std::collections::HashMap;

use crate::model::HospRecord;

/// Summary statistics over one group of records.
///
/// Null-rate records count toward `total_records` only, so
/// `total_records >= count` always holds. When a group has no non-null
/// rate at all, the rate fields are zero by definition rather than "no
/// data" -- callers that need the distinction track it separately (see
/// the heat-map view's `has_data`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub avg_rate: f64,
    pub max_rate: f64,
    pub min_rate: f64,
    pub total_records: usize,
}

/// Partitions records by a caller-supplied key accessor.
///
/// Absent or empty key values bucket under `"Unknown"`. Every record lands
/// in exactly one group, and each group keeps its records in input order.
pub fn group_by<'a, R, K>(records: &'a [R], key: K) -> HashMap<String, Vec<&'a R>>
where
    K: Fn(&R) -> Option<&str>,
{
    let mut groups: HashMap<String, Vec<&R>> = HashMap::new();

    for record in records {
        let bucket = match key(record) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => "Unknown".to_string(),
        };
        groups.entry(bucket).or_default().push(record);
    }

    groups
}

/// Computes summary statistics in a single pass over the rates.
pub fn summarize<'a, I>(records: I) -> SummaryStats
where
    I: IntoIterator<Item = &'a HospRecord>,
{
    let mut total_records = 0;
    let mut count = 0;
    let mut sum = 0.0;
    let mut max_rate = f64::NEG_INFINITY;
    let mut min_rate = f64::INFINITY;

    for record in records {
        total_records += 1;
        if let Some(rate) = record.monthly_rate {
            count += 1;
            sum += rate;
            max_rate = max_rate.max(rate);
            min_rate = min_rate.min(rate);
        }
    }

    if count == 0 {
        return SummaryStats {
            count: 0,
            avg_rate: 0.0,
            max_rate: 0.0,
            min_rate: 0.0,
            total_records,
        };
    }

    SummaryStats {
        count,
        avg_rate: sum / count as f64,
        max_rate,
        min_rate,
        total_records,
    }
}
