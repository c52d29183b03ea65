//! Record filtering, sorting, pagination, and per-state summaries.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

use crate::engine::summary::{SummaryStats, summarize};
use crate::model::HospRecord;

/// Composable record filter. Every field is optional; an unset field
/// matches everything. String matches are case-insensitive exact matches.
/// Rate and date bounds exclude records whose corresponding field is null,
/// so bounded queries only ever see concrete values.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub state: Option<String>,
    pub season: Option<String>,
    pub age_category: Option<String>,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn matches(&self, record: &HospRecord) -> bool {
        field_matches(&self.state, &record.state)
            && field_matches(&self.season, &record.season)
            && field_matches(&self.age_category, &record.age_category)
            && field_matches(&self.sex, &record.sex)
            && field_matches(&self.race, &record.race)
            && bound_matches(self.min_rate, record.monthly_rate, |v, b| v >= b)
            && bound_matches(self.max_rate, record.monthly_rate, |v, b| v <= b)
            && bound_matches(self.start_date, record.date, |v, b| v >= b)
            && bound_matches(self.end_date, record.date, |v, b| v <= b)
    }

    pub fn apply(&self, records: &[HospRecord]) -> Vec<HospRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

fn field_matches(want: &Option<String>, got: &Option<String>) -> bool {
    match want {
        None => true,
        Some(w) => got.as_deref().is_some_and(|g| g.eq_ignore_ascii_case(w)),
    }
}

fn bound_matches<T: Copy>(bound: Option<T>, value: Option<T>, ok: impl Fn(T, T) -> bool) -> bool {
    match bound {
        None => true,
        Some(b) => value.is_some_and(|v| ok(v, b)),
    }
}

/// Sortable record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortBy {
    Date,
    State,
    Rate,
    Season,
    AgeCategory,
    Sex,
    Race,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sorts records in place. Null fields order first ascending; a null rate
/// sorts as -1, below any published (non-negative) rate.
pub fn sort_records(records: &mut [HospRecord], by: SortBy, order: SortOrder) {
    records.sort_by(|a, b| {
        let ord = match by {
            SortBy::Date => a.date.cmp(&b.date),
            SortBy::State => a.state.cmp(&b.state),
            SortBy::Rate => a
                .monthly_rate
                .unwrap_or(-1.0)
                .partial_cmp(&b.monthly_rate.unwrap_or(-1.0))
                .unwrap_or(Ordering::Equal),
            SortBy::Season => a.season.cmp(&b.season),
            SortBy::AgeCategory => a.age_category.cmp(&b.age_category),
            SortBy::Sex => a.sex.cmp(&b.sex),
            SortBy::Race => a.race.cmp(&b.race),
        };
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total_records: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of records plus its pagination metadata.
#[derive(Debug, Serialize)]
pub struct Page {
    pub data: Vec<HospRecord>,
    pub pagination: Pagination,
}

/// Slices a result set into one page. Pages are 1-based; out-of-range
/// pages yield an empty data set with intact metadata.
pub fn paginate(records: Vec<HospRecord>, page: usize, per_page: usize) -> Page {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_records = records.len();
    let total_pages = total_records.div_ceil(per_page);

    // saturate so an absurd --page stays on the empty-page path
    let start = (page - 1).saturating_mul(per_page);
    let end = start.saturating_add(per_page).min(total_records);
    let data = if start >= total_records {
        Vec::new()
    } else {
        records[start..end].to_vec()
    };

    Page {
        data,
        pagination: Pagination {
            page,
            per_page,
            total_records,
            total_pages,
            has_next: end < total_records,
            has_prev: page > 1,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Distinct values available for each filter, for populating UI dropdowns.
#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub seasons: Vec<String>,
    pub age_categories: Vec<String>,
    pub sex: Vec<String>,
    pub race: Vec<String>,
    pub date_range: DateRange,
}

pub fn filter_options(records: &[HospRecord]) -> FilterOptions {
    FilterOptions {
        states: distinct(records, |r| r.state.as_deref()),
        seasons: distinct(records, |r| r.season.as_deref()),
        age_categories: distinct(records, |r| r.age_category.as_deref()),
        sex: distinct(records, |r| r.sex.as_deref()),
        race: distinct(records, |r| r.race.as_deref()),
        date_range: date_range(records),
    }
}

/// Sorted distinct non-null values of one record field.
fn distinct<K>(records: &[HospRecord], key: K) -> Vec<String>
where
    K: Fn(&HospRecord) -> Option<&str>,
{
    let set: BTreeSet<&str> = records.iter().filter_map(|r| key(r)).collect();
    set.into_iter().map(str::to_string).collect()
}

pub fn date_range(records: &[HospRecord]) -> DateRange {
    let dates = records.iter().filter_map(|r| r.date);
    DateRange {
        start: dates.clone().min(),
        end: dates.max(),
    }
}

/// Summary for one state: overall statistics plus the seasons, age
/// categories, and months it covers.
#[derive(Debug, Serialize)]
pub struct StateSummary {
    pub state: String,
    pub total_records: usize,
    pub date_range: DateRange,
    pub statistics: SummaryStats,
    pub total_months: usize,
    pub seasons: Vec<String>,
    pub age_categories: Vec<String>,
}

/// Summarizes all records for one state (case-insensitive exact match).
/// Returns `None` when no record names the state.
pub fn state_summary(records: &[HospRecord], state: &str) -> Option<StateSummary> {
    let filter = RecordFilter {
        state: Some(state.to_string()),
        ..RecordFilter::default()
    };
    let matched = filter.apply(records);
    if matched.is_empty() {
        return None;
    }

    let months: BTreeSet<&str> = matched.iter().filter_map(|r| r.year_month.as_deref()).collect();

    Some(StateSummary {
        state: state.to_string(),
        total_records: matched.len(),
        date_range: date_range(&matched),
        statistics: summarize(&matched),
        total_months: months.len(),
        seasons: distinct(&matched, |r| r.season.as_deref()),
        age_categories: distinct(&matched, |r| r.age_category.as_deref()),
    })
}
