//! CSV export functionality
//!
//! Provides CSV serialization for category breakdowns and trend series.

use std::path::Path;

use csv::Writer;
use serde::Serialize;

use super::{ExportableBucket, ExportableCategory};
use crate::metrics::CategoryRow;
use crate::trends::TrendSeries;
use crate::CommandError;

fn write_rows<T: Serialize>(rows: &[T], path: &Path) -> Result<(), CommandError> {
    let file = std::fs::File::create(path)
        .map_err(|e| CommandError::Export(format!("Failed to create CSV file: {}", e)))?;

    let mut writer = Writer::from_writer(file);

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| CommandError::Export(format!("Failed to write CSV record: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| CommandError::Export(format!("Failed to flush CSV: {}", e)))?;

    Ok(())
}

/// Write a category breakdown to CSV format
pub fn write_category_csv(rows: &[CategoryRow], path: &Path) -> Result<(), CommandError> {
    let rows: Vec<ExportableCategory> = rows.iter().map(ExportableCategory::from).collect();
    write_rows(&rows, path)
}

/// Write a trend series to CSV format, one line per bucket
pub fn write_trend_csv(series: &TrendSeries, path: &Path) -> Result<(), CommandError> {
    let rows: Vec<ExportableBucket> = series.buckets.iter().map(ExportableBucket::from).collect();
    write_rows(&rows, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Interval;
    use crate::period::calendar::{end_of_day, start_of_day};
    use crate::trends::{Bucket, Granularity};
    use chrono::NaiveDate;
    use std::fs;

    fn create_test_rows() -> Vec<CategoryRow> {
        vec![
            CategoryRow {
                category: "website".to_string(),
                current_count: 5,
                previous_count: 4,
            },
            CategoryRow {
                category: "redes sociais".to_string(),
                current_count: 2,
                previous_count: 0,
            },
        ]
    }

    fn create_test_series() -> TrendSeries {
        let first = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let second = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let mut a = Bucket::new(first, Granularity::Day);
        a.count = 3;
        let b = Bucket::new(second, Granularity::Day);

        TrendSeries::new(
            Granularity::Day,
            Interval::new(start_of_day(first), end_of_day(second)),
            vec![a, b],
        )
    }

    #[test]
    fn test_write_category_csv() {
        let path = std::env::temp_dir().join("leadpulse_test_categories.csv");

        write_category_csv(&create_test_rows(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "category,current_count,previous_count,change_percent");
        assert_eq!(lines[1], "website,5,4,25.0");
        assert_eq!(lines[2], "redes sociais,2,0,");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_trend_csv() {
        let path = std::env::temp_dir().join("leadpulse_test_trend.csv");

        write_trend_csv(&create_test_series(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("period,label,count"));
        assert!(content.contains("2024-05-01,01/05,3"));
        assert!(content.contains("2024-05-02,02/05,0"));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_csv_to_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join("leadpulse_missing_dir")
            .join("nested")
            .join("out.csv");

        let result = write_category_csv(&create_test_rows(), &path);
        assert!(matches!(result, Err(CommandError::Export(_))));
    }
}
