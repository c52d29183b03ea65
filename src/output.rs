//! Output formatting and persistence for query results.
//!
//! JSON goes to stdout (the program's product); logs stay on stderr.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::model::HospRecord;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Prints any serializable result as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends records as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, records: &[HospRecord]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = records.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_record() -> HospRecord {
        HospRecord {
            id: 1,
            state: Some("Ohio".to_string()),
            season: Some("2023-24".to_string()),
            year_month: Some("202310".to_string()),
            year: Some(2023),
            month: Some(10),
            date: chrono::NaiveDate::from_ymd_opt(2023, 10, 1),
            month_name: Some("October".to_string()),
            formatted_date: Some("October 2023".to_string()),
            age_category: Some("All".to_string()),
            sex: Some("All".to_string()),
            race: Some("All".to_string()),
            monthly_rate: Some(12.5),
            rate_type: "Crude Rate".to_string(),
        }
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_record()).unwrap();
    }

    #[test]
    fn test_append_records_creates_file() {
        let path = temp_path("covidnet_mapper_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_records(&path, &[sample_record()]).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Ohio"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_records_writes_header_once() {
        let path = temp_path("covidnet_mapper_test_header.csv");
        let _ = fs::remove_file(&path);

        append_records(&path, &[sample_record()]).unwrap();
        append_records(&path, &[sample_record()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content
            .lines()
            .filter(|l| l.contains("year_month"))
            .count();
        assert_eq!(header_count, 1);

        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
