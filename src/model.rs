//! Record type shared by the parser, query layer, and aggregation engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One COVID-NET observation: a jurisdiction/month/demographic slice with a
/// nullable hospitalization rate (per 100,000 population).
///
/// Records are immutable inputs; every downstream operation reads them and
/// produces derived values. A `None` in `monthly_rate` means the dataset
/// published no rate for this slice, which is common for small strata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospRecord {
    pub id: usize,
    pub state: Option<String>,
    pub season: Option<String>,
    /// Raw `YYYYMM` bucket as published, e.g. `"202310"`.
    pub year_month: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    /// First day of the observation month, when `year_month` parsed.
    pub date: Option<NaiveDate>,
    pub month_name: Option<String>,
    /// Display form, e.g. `"October 2023"`. Falls back to the raw
    /// `year_month` string when that string did not parse.
    pub formatted_date: Option<String>,
    pub age_category: Option<String>,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub monthly_rate: Option<f64>,
    pub rate_type: String,
}
