//! JSON export functionality
//!
//! Provides JSON serialization for category breakdowns and trend series
//! with export metadata and totals.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::{ExportableBucket, ExportableCategory};
use crate::metrics::CategoryRow;
use crate::trends::{Granularity, TrendSeries};
use crate::CommandError;

const EXPORT_VERSION: &str = "1.0.0";

/// Category breakdown export structure
#[derive(Debug, Clone, Serialize)]
pub struct CategoryExportJson {
    pub export_date: String,
    pub export_version: &'static str,
    pub title: String,
    pub total_current: u32,
    pub total_previous: u32,
    pub rows: Vec<ExportableCategory>,
}

/// Trend series export structure
#[derive(Debug, Clone, Serialize)]
pub struct TrendExportJson {
    pub export_date: String,
    pub export_version: &'static str,
    pub granularity: Granularity,
    pub start: String,
    pub end: String,
    pub total: u32,
    pub buckets: Vec<ExportableBucket>,
}

fn write_json<T: Serialize>(export: &T, path: &Path) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(export)
        .map_err(|e| CommandError::Export(format!("Failed to serialize JSON: {}", e)))?;

    let mut file = std::fs::File::create(path)
        .map_err(|e| CommandError::Export(format!("Failed to create JSON file: {}", e)))?;

    file.write_all(json.as_bytes())
        .map_err(|e| CommandError::Export(format!("Failed to write JSON file: {}", e)))?;

    Ok(())
}

/// Write a category breakdown to JSON format
pub fn write_category_json(
    rows: &[CategoryRow],
    title: &str,
    path: &Path,
) -> Result<(), CommandError> {
    let export = CategoryExportJson {
        export_date: chrono::Utc::now().to_rfc3339(),
        export_version: EXPORT_VERSION,
        title: title.to_string(),
        total_current: rows.iter().map(|r| r.current_count).sum(),
        total_previous: rows.iter().map(|r| r.previous_count).sum(),
        rows: rows.iter().map(ExportableCategory::from).collect(),
    };

    write_json(&export, path)
}

/// Write a trend series to JSON format
pub fn write_trend_json(series: &TrendSeries, path: &Path) -> Result<(), CommandError> {
    let export = TrendExportJson {
        export_date: chrono::Utc::now().to_rfc3339(),
        export_version: EXPORT_VERSION,
        granularity: series.granularity,
        start: series.interval.start.format("%Y-%m-%d").to_string(),
        end: series.interval.end.format("%Y-%m-%d").to_string(),
        total: series.total,
        buckets: series.buckets.iter().map(ExportableBucket::from).collect(),
    };

    write_json(&export, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Interval;
    use crate::period::calendar::{end_of_day, start_of_day};
    use crate::trends::Bucket;
    use chrono::NaiveDate;
    use std::fs;

    #[test]
    fn test_write_category_json() {
        let path = std::env::temp_dir().join("leadpulse_test_categories.json");
        let rows = vec![
            CategoryRow {
                category: "lisboa".to_string(),
                current_count: 3,
                previous_count: 1,
            },
            CategoryRow {
                category: "porto".to_string(),
                current_count: 1,
                previous_count: 2,
            },
        ];

        write_category_json(&rows, "Contacts by county", &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["export_version"], "1.0.0");
        assert_eq!(parsed["title"], "Contacts by county");
        assert_eq!(parsed["total_current"], 4);
        assert_eq!(parsed["total_previous"], 3);
        assert_eq!(parsed["rows"][0]["category"], "lisboa");
        assert_eq!(parsed["rows"][1]["change_percent"], -50.0);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_trend_json() {
        let path = std::env::temp_dir().join("leadpulse_test_trend.json");
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let mut january = Bucket::new(first, Granularity::Month);
        january.count = 4;
        let mut february = Bucket::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), Granularity::Month);
        february.count = 1;
        let series = TrendSeries::new(
            Granularity::Month,
            Interval::new(start_of_day(first), end_of_day(last)),
            vec![january, february],
        );

        write_trend_json(&series, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["granularity"], "month");
        assert_eq!(parsed["start"], "2024-01-01");
        assert_eq!(parsed["end"], "2024-02-29");
        assert_eq!(parsed["total"], 5);
        assert_eq!(parsed["buckets"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["buckets"][1]["period"], "2024-02");

        fs::remove_file(&path).ok();
    }
}
