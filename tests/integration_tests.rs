use covidnet_mapper::engine::heatmap::build_jurisdiction_view;
use covidnet_mapper::engine::trends::{recent_window, to_series, trends_over_time};
use covidnet_mapper::parser::parse_records;
use covidnet_mapper::query::{RecordFilter, filter_options, paginate, state_summary};

fn fixture_records() -> Vec<covidnet_mapper::model::HospRecord> {
    let raw = include_str!("fixtures/sample_rows.json");
    parse_records(raw.as_bytes()).expect("Failed to parse fixture dataset")
}

#[test]
fn test_parse_fixture_skips_only_the_truncated_row() {
    let records = fixture_records();

    // 9 rows in the fixture, one of them truncated
    assert_eq!(records.len(), 8);
    assert!(records.iter().any(|r| r.state.as_deref() == Some("Ohio")));
}

#[test]
fn test_heatmap_pipeline() {
    let records = fixture_records();
    let view = build_jurisdiction_view(&records);

    // 51 registry jurisdictions + Guam pass-through + Unknown bucket
    assert_eq!(view.len(), 53);

    let ohio = view.iter().find(|e| e.state == "Ohio").unwrap();
    assert!(ohio.has_data);
    assert_eq!(ohio.state_code, "OH");
    assert_eq!(ohio.total_records, 3);
    assert_eq!(ohio.avg_rate, (12.5 + 27.75) / 2.0);
    assert_eq!(ohio.bucket.label, "10-24 (Low)");

    let california = view.iter().find(|e| e.state == "California").unwrap();
    assert_eq!(california.bucket.label, "50-99 (High)");

    let wyoming = view.iter().find(|e| e.state == "Wyoming").unwrap();
    assert!(!wyoming.has_data);
    assert_eq!(wyoming.bucket.label, "No Data");

    let guam = view.iter().find(|e| e.state == "Guam").unwrap();
    assert_eq!(guam.state_code, "Guam");
}

#[test]
fn test_trends_pipeline() {
    let records = fixture_records();
    let filter = RecordFilter {
        state: Some("ohio".to_string()),
        ..RecordFilter::default()
    };

    let matched = filter.apply(&records);
    let trends = trends_over_time(&matched);

    assert_eq!(trends.len(), 3);
    assert_eq!(trends[0].year_month, "202310");
    assert_eq!(trends[0].avg_rate, 12.5);
    // null-rate November bucket is zeroed, not dropped
    assert_eq!(trends[1].count, 0);
    assert_eq!(trends[1].avg_rate, 0.0);

    let series = to_series(&trends);
    assert_eq!(series.len(), 3);
    assert!(series.windows(2).all(|w| w[0].x < w[1].x));

    let windowed = recent_window(&trends, 2);
    assert_eq!(windowed.len(), 2);
    assert_eq!(windowed[0].year_month, "202311");
}

#[test]
fn test_query_pipeline() {
    let records = fixture_records();

    let summary = state_summary(&records, "California").unwrap();
    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.statistics.avg_rate, (104.2 + 61.0) / 2.0);
    assert_eq!(summary.total_months, 2);

    let options = filter_options(&records);
    assert_eq!(
        options.states,
        vec!["California", "Guam", "Ohio", "Texas"]
    );

    let page = paginate(records, 1, 5);
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(page.pagination.has_next);
}
