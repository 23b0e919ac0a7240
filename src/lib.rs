//! LeadPulse - contacts and leads dashboard backend
//!
//! This library computes the period-comparison analytics behind the CRM
//! dashboard. It handles:
//! - Fetching contacts and leads from the spreadsheet API
//! - Resolving reporting periods and their comparison periods
//! - Filtering records by interval
//! - Zero-filled trend series and rolling registration history
//! - Category breakdowns and conversion metrics
//! - CSV/JSON export

pub mod commands;
pub mod config;
pub mod export;
pub mod filter;
pub mod metrics;
pub mod models;
pub mod period;
pub mod source;
pub mod trends;

/// Error type for dashboard commands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Source error: {0}")]
    Source(#[from] source::SourceError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// Errors cross to the UI as plain strings
impl serde::Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Install the global `tracing` subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}
