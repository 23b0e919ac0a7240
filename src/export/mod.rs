//! Export module for CSV and JSON export functionality
//!
//! Writes category breakdowns and trend series to files the dashboard
//! user can download.

pub mod csv_export;
pub mod json_export;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metrics::{CategoryRow, Comparison};
use crate::trends::Bucket;
use crate::CommandError;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(CommandError::InvalidRequest(format!(
                "Invalid export format: {}. Use 'csv' or 'json'",
                s
            ))),
        }
    }
}

impl ExportFormat {
    /// Get file extension for format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Exportable category row for CSV/JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportableCategory {
    pub category: String,
    pub current_count: u32,
    pub previous_count: u32,
    pub change_percent: Option<f64>,
}

impl From<&CategoryRow> for ExportableCategory {
    fn from(row: &CategoryRow) -> Self {
        let comparison = Comparison::counts(row.current_count as usize, row.previous_count as usize);
        Self {
            category: row.category.clone(),
            current_count: row.current_count,
            previous_count: row.previous_count,
            change_percent: comparison.percent_change,
        }
    }
}

/// Exportable trend bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportableBucket {
    pub period: String,
    pub label: String,
    pub count: u32,
}

impl From<&Bucket> for ExportableBucket {
    fn from(bucket: &Bucket) -> Self {
        Self {
            period: bucket.key.clone(),
            label: bucket.label.clone(),
            count: bucket.count,
        }
    }
}

/// Get the default export directory (Downloads folder or temp dir)
pub fn get_export_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::document_dir)
        .unwrap_or_else(std::env::temp_dir)
}

/// Generate a timestamped filename for exports
pub fn generate_export_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.{}", prefix, timestamp, extension)
}

pub use csv_export::*;
pub use json_export::*;
