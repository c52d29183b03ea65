//! Parser for the Socrata `rows.json` export of the COVID-NET dataset.
//!
//! The export carries column metadata under `meta.view.columns` and the
//! observations as positional arrays under `data`. Leading columns flagged
//! `hidden` are Socrata bookkeeping (row ids, timestamps) and are skipped;
//! the visible tail is, in order: state, season, year-month, age category,
//! sex, race, monthly rate, rate type.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::HospRecord;

#[derive(Deserialize)]
struct Dataset {
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

#[derive(Deserialize, Default)]
struct Meta {
    #[serde(default)]
    view: View,
}

#[derive(Deserialize, Default)]
struct View {
    #[serde(default)]
    columns: Vec<Column>,
}

#[derive(Deserialize)]
struct Column {
    #[serde(rename = "fieldName", default)]
    field_name: String,
    #[serde(default)]
    flags: Vec<String>,
}

/// Parses a raw `rows.json` document into records.
///
/// Row-level problems (short rows, unparsable values) are logged and
/// skipped, never fatal. Only a malformed top-level document is an error.
pub fn parse_records(raw: &[u8]) -> Result<Vec<HospRecord>> {
    let dataset: Dataset =
        serde_json::from_slice(raw).context("malformed rows.json document")?;

    // Socrata bookkeeping columns form a leading prefix; count only that
    // run so a stray hidden flag on a later column cannot shift the offset
    // and misalign every field.
    let hidden = dataset
        .meta
        .view
        .columns
        .iter()
        .take_while(|c| c.flags.iter().any(|f| f == "hidden"))
        .count();

    let visible_fields: Vec<&str> = dataset
        .meta
        .view
        .columns
        .get(hidden..)
        .unwrap_or(&[])
        .iter()
        .map(|c| c.field_name.as_str())
        .collect();
    debug!(hidden, ?visible_fields, "Resolved dataset columns");

    let mut records = Vec::with_capacity(dataset.data.len());

    for (i, row) in dataset.data.iter().enumerate() {
        if row.len() < hidden + 6 {
            warn!(row = i, len = row.len(), "Skipping incomplete row");
            continue;
        }
        let visible = &row[hidden..];

        let year_month = as_string(&visible[2]);
        let expanded = year_month.as_deref().map(expand_year_month);

        records.push(HospRecord {
            id: i + 1,
            state: as_string(&visible[0]),
            season: as_string(&visible[1]),
            year_month,
            year: expanded.as_ref().and_then(|e| e.year),
            month: expanded.as_ref().and_then(|e| e.month),
            date: expanded.as_ref().and_then(|e| e.date),
            month_name: expanded.as_ref().and_then(|e| e.month_name.clone()),
            formatted_date: expanded.as_ref().map(|e| e.formatted.clone()),
            age_category: as_string(&visible[3]),
            sex: as_string(&visible[4]),
            race: as_string(&visible[5]),
            monthly_rate: visible.get(6).and_then(parse_rate),
            rate_type: visible
                .get(7)
                .and_then(as_string)
                .unwrap_or_else(|| "Crude Rate".to_string()),
        });
    }

    debug!(
        parsed = records.len(),
        total = dataset.data.len(),
        "Dataset parsed"
    );
    Ok(records)
}

struct YearMonth {
    year: Option<i32>,
    month: Option<u32>,
    date: Option<NaiveDate>,
    month_name: Option<String>,
    formatted: String,
}

/// Expands a `"YYYYMM"` bucket (an optional `.0` suffix is tolerated, the
/// export sometimes serializes the bucket as a float) into date components.
/// Unparsable input leaves the date fields empty and keeps the raw string
/// as the display form.
fn expand_year_month(raw: &str) -> YearMonth {
    let trimmed = raw.strip_suffix(".0").unwrap_or(raw);

    // byte-length check alone is not enough: a multibyte cell like "202€"
    // is 6 bytes but cannot be sliced at 4, so gate on ASCII first
    let parsed = if trimmed.len() == 6 && trimmed.is_ascii() {
        let year = trimmed[..4].parse::<i32>().ok();
        let month = trimmed[4..].parse::<u32>().ok();
        match (year, month) {
            (Some(y), Some(m)) => NaiveDate::from_ymd_opt(y, m, 1).map(|d| (y, m, d)),
            _ => None,
        }
    } else {
        None
    };

    match parsed {
        Some((year, month, date)) => {
            let month_name = date.format("%B").to_string();
            let formatted = format!("{month_name} {year}");
            YearMonth {
                year: Some(year),
                month: Some(month),
                date: Some(date),
                month_name: Some(month_name),
                formatted,
            }
        }
        None => YearMonth {
            year: None,
            month: None,
            date: None,
            month_name: None,
            formatted: raw.to_string(),
        },
    }
}

/// Reads a cell as a non-empty string. Numeric cells are stringified, which
/// covers year-month buckets the export serializes as numbers.
fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a rate cell as a float. Rates arrive as JSON numbers or numeric
/// strings; anything else (blank, null, garbage) becomes `None`.
fn parse_rate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
