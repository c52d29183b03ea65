//! Jurisdiction heat-map data builder.

use serde::Serialize;

use crate::engine::classify::{RateBucket, classify};
use crate::engine::registry;
use crate::engine::summary::{group_by, summarize};
use crate::model::HospRecord;

/// Heat-map entry for one jurisdiction.
///
/// `has_data` distinguishes "no records named this jurisdiction" from a
/// covered jurisdiction whose rates were all null (which summarizes to an
/// average of zero).
#[derive(Debug, Clone, Serialize)]
pub struct JurisdictionRateEntry {
    pub state: String,
    pub state_code: String,
    pub avg_rate: f64,
    pub total_records: usize,
    pub has_data: bool,
    pub bucket: RateBucket,
}

/// Builds the per-jurisdiction view the heat map renders.
///
/// Records are grouped by jurisdiction name and summarized; names missing
/// from the registry keep the raw name as a pseudo-code rather than being
/// rejected. Registry jurisdictions with no records are then supplemented
/// as `has_data = false` entries, so the output always carries exactly one
/// entry per registry jurisdiction. Covered entries come first, then the
/// supplemented ones.
pub fn build_jurisdiction_view(records: &[HospRecord]) -> Vec<JurisdictionRateEntry> {
    let groups = group_by(records, |r| r.state.as_deref());

    let mut entries: Vec<JurisdictionRateEntry> = groups
        .iter()
        .map(|(state, group)| {
            let stats = summarize(group.iter().copied());
            let code = registry::code_for(state).unwrap_or(state);

            JurisdictionRateEntry {
                state: state.clone(),
                state_code: code.to_string(),
                avg_rate: stats.avg_rate,
                total_records: stats.total_records,
                has_data: true,
                bucket: classify(stats.avg_rate, true),
            }
        })
        .collect();

    for &(name, code) in registry::JURISDICTIONS {
        if groups.contains_key(name) {
            continue;
        }
        entries.push(JurisdictionRateEntry {
            state: name.to_string(),
            state_code: code.to_string(),
            avg_rate: 0.0,
            total_records: 0,
            has_data: false,
            bucket: classify(0.0, false),
        });
    }

    entries
}

/// Single-line tooltip text for a jurisdiction entry.
pub fn format_tooltip(entry: &JurisdictionRateEntry) -> String {
    if !entry.has_data {
        return format!("{}: No Data Available", entry.state);
    }
    format!(
        "{}: {:.1} avg rate ({} records)",
        entry.state, entry.avg_rate, entry.total_records
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn record(state: Option<&str>, rate: Option<f64>) -> HospRecord {
        HospRecord {
            id: 0,
            state: state.map(str::to_string),
            season: None,
            year_month: None,
            year: None,
            month: None,
            date: None,
            month_name: None,
            formatted_date: None,
            age_category: None,
            sex: None,
            race: None,
            monthly_rate: rate,
            rate_type: "Crude Rate".to_string(),
        }
    }

    fn entry<'a>(
        view: &'a [JurisdictionRateEntry],
        state: &str,
    ) -> &'a JurisdictionRateEntry {
        view.iter().find(|e| e.state == state).unwrap()
    }

    #[test]
    fn test_empty_input_yields_all_51_without_data() {
        let view = build_jurisdiction_view(&[]);

        assert_eq!(view.len(), 51);
        assert!(view.iter().all(|e| !e.has_data));
        assert!(view.iter().all(|e| e.avg_rate == 0.0 && e.total_records == 0));
        assert!(view.iter().all(|e| e.bucket.label == "No Data"));
    }

    #[test]
    fn test_every_registry_jurisdiction_appears_exactly_once() {
        let records = vec![
            record(Some("Ohio"), Some(12.0)),
            record(Some("Texas"), Some(60.0)),
        ];

        let view = build_jurisdiction_view(&records);

        let names: HashSet<_> = view.iter().map(|e| e.state.as_str()).collect();
        assert_eq!(view.len(), 51);
        assert_eq!(names.len(), 51);
        for &(name, _) in registry::JURISDICTIONS {
            assert!(names.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_covered_jurisdiction_summary() {
        let records = vec![
            record(Some("Ohio"), Some(12.5)),
            record(Some("Ohio"), None),
        ];

        let view = build_jurisdiction_view(&records);
        let ohio = entry(&view, "Ohio");

        assert!(ohio.has_data);
        assert_eq!(ohio.state_code, "OH");
        assert_eq!(ohio.avg_rate, 12.5);
        assert_eq!(ohio.total_records, 2);
        assert_eq!(ohio.bucket.label, "10-24 (Low)");
    }

    #[test]
    fn test_unrecognized_name_passes_through_as_pseudo_code() {
        let records = vec![record(Some("Guam"), Some(5.0))];

        let view = build_jurisdiction_view(&records);
        let guam = entry(&view, "Guam");

        assert!(guam.has_data);
        assert_eq!(guam.state_code, "Guam");
        // registry entries are all still present alongside the extra one
        assert_eq!(view.len(), 52);
    }

    #[test]
    fn test_nameless_records_bucket_under_unknown() {
        let records = vec![record(None, Some(3.0))];

        let view = build_jurisdiction_view(&records);
        let unknown = entry(&view, "Unknown");

        assert!(unknown.has_data);
        assert_eq!(unknown.state_code, "Unknown");
        assert_eq!(view.len(), 52);
    }

    #[test]
    fn test_covered_all_null_rates_is_zero_rate_with_data() {
        let records = vec![record(Some("Maine"), None)];

        let view = build_jurisdiction_view(&records);
        let maine = entry(&view, "Maine");

        assert!(maine.has_data);
        assert_eq!(maine.avg_rate, 0.0);
        assert_eq!(maine.total_records, 1);
        // has_data=true with a zero rate is "No Rate Data", not "No Data"
        assert_eq!(maine.bucket.label, "No Rate Data");
    }

    #[test]
    fn test_order_independence_of_the_entry_set() {
        let forward = vec![
            record(Some("Ohio"), Some(10.0)),
            record(Some("Texas"), Some(20.0)),
            record(Some("Ohio"), Some(30.0)),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let mut a: Vec<_> = build_jurisdiction_view(&forward)
            .into_iter()
            .map(|e| (e.state, e.avg_rate, e.total_records, e.has_data))
            .collect();
        let mut b: Vec<_> = build_jurisdiction_view(&reversed)
            .into_iter()
            .map(|e| (e.state, e.avg_rate, e.total_records, e.has_data))
            .collect();
        a.sort_by(|x, y| x.0.cmp(&y.0));
        b.sort_by(|x, y| x.0.cmp(&y.0));

        assert_eq!(a, b);
    }

    #[test]
    fn test_tooltip_formats() {
        let records = vec![record(Some("Ohio"), Some(12.53))];
        let view = build_jurisdiction_view(&records);

        assert_eq!(
            format_tooltip(entry(&view, "Ohio")),
            "Ohio: 12.5 avg rate (1 records)"
        );
        assert_eq!(
            format_tooltip(entry(&view, "Texas")),
            "Texas: No Data Available"
        );
    }
}
