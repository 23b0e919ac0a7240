//! Dashboard command handlers
//!
//! Entry points exposed to the frontend. Every command receives the records
//! fetched by `load_records`, the query sent by the UI, and an explicit `now`,
//! and returns a serializable response DTO.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::export::{
    csv_export, generate_export_filename, get_export_directory, json_export, ExportFormat,
};
use crate::filter::{earliest_timestamp, filter};
use crate::metrics::categories::{self, CategoryOptions, CategoryRow, CategoryShare};
use crate::metrics::conversion::{conversion_trend, ConversionSummary};
use crate::metrics::Comparison;
use crate::models::{CategoryField, Interval, PeriodSelector, Record, TimestampPolicy};
use crate::period::{previous_label, resolve_current, resolve_previous};
use crate::source::{RecordSet, SpreadsheetClient};
use crate::trends::buckets::trend_series;
use crate::trends::history::{registration_history, DEFAULT_HISTORY_PERIODS};
use crate::trends::{Bucket, Granularity, TrendSeries};
use crate::CommandError;

// ============================================================================
// Request/Response DTOs for Frontend
// ============================================================================

/// Period selection sent by the UI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardQuery {
    /// Period name ("today", "7days", "month", "custom", ...)
    pub period: Option<String>,
    /// Custom range bounds (YYYY-MM-DD)
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub adjust_comparisons: bool,
    /// Optional bucket unit override
    pub granularity: Option<String>,
}

impl DashboardQuery {
    /// Query carrying the configured default period
    pub fn from_config(config: &Config) -> Self {
        Self {
            period: Some(config.default_period.clone()),
            adjust_comparisons: config.adjust_comparisons,
            ..Self::default()
        }
    }

    pub fn selector(&self) -> PeriodSelector {
        PeriodSelector::from_parts(self.period.as_deref().unwrap_or("today"), self.from, self.to)
    }

    pub fn granularity_override(&self) -> Option<Granularity> {
        self.granularity.as_deref().map(Granularity::from)
    }
}

/// Resolved current and comparison intervals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodWindow {
    pub selector: PeriodSelector,
    pub label: String,
    pub current: Interval,
    pub previous: Option<Interval>,
    pub previous_label: String,
}

impl PeriodWindow {
    /// `earliest` only matters for all-time queries
    pub fn resolve(query: &DashboardQuery, now: NaiveDateTime, earliest: Option<NaiveDateTime>) -> Self {
        let selector = query.selector();
        Self {
            label: selector.label(),
            current: resolve_current(&selector, now, earliest),
            previous: resolve_previous(&selector, now, query.adjust_comparisons),
            previous_label: previous_label(&selector, now),
            selector,
        }
    }

    /// Records in the current and previous intervals
    fn split<'a>(
        &self,
        records: &'a [Record],
        policy: TimestampPolicy,
    ) -> (Vec<&'a Record>, Option<Vec<&'a Record>>) {
        let current = filter(records, &self.current, policy);
        let previous = self
            .previous
            .as_ref()
            .map(|interval| filter(records, interval, policy));
        (current, previous)
    }
}

/// A headline count with its comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalSummary {
    pub current: usize,
    pub previous: Option<usize>,
    pub change: Option<Comparison>,
}

impl TotalSummary {
    fn new(current: usize, previous: Option<usize>) -> Self {
        Self {
            current,
            previous,
            change: previous.map(|p| Comparison::counts(current, p)),
        }
    }
}

/// Everything the main dashboard page renders
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub period: PeriodWindow,
    pub contacts: TotalSummary,
    pub leads: TotalSummary,
    /// Current leads per current contact, in percent
    pub lead_ratio: f64,
    pub origin: Vec<CategoryRow>,
    pub origin_shares: Vec<CategoryShare>,
    pub county: Vec<CategoryRow>,
    pub service: Vec<CategoryRow>,
    pub contact_trend: TrendSeries,
}

/// Category table plus pie-chart shares
#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub period: PeriodWindow,
    pub field: CategoryField,
    pub rows: Vec<CategoryRow>,
    pub shares: Vec<CategoryShare>,
}

/// Current trend series with the previous period's series for overlay
#[derive(Debug, Clone, Serialize)]
pub struct TrendComparison {
    pub period: PeriodWindow,
    pub current: TrendSeries,
    pub previous: Option<TrendSeries>,
}

/// Conversions page payload
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub period: PeriodWindow,
    pub summary: ConversionSummary,
    pub trend: TrendSeries,
}

// ============================================================================
// Helpers
// ============================================================================

fn breakdown<'a>(
    current: &[&'a Record],
    previous: Option<&Vec<&'a Record>>,
    field: CategoryField,
    options: &CategoryOptions,
) -> Vec<CategoryRow> {
    let previous = previous.map(|p| p.as_slice()).unwrap_or(&[]);
    categories::aggregate(
        current.iter().copied(),
        previous.iter().copied(),
        |r| field.value(r),
        options,
    )
}

/// History unit implied by the selector when the query sets none
fn history_unit(selector: &PeriodSelector) -> Granularity {
    match selector {
        PeriodSelector::ThisWeek => Granularity::Week,
        PeriodSelector::ThisMonth | PeriodSelector::Last12Months => Granularity::Month,
        PeriodSelector::ThisYear | PeriodSelector::AllTime => Granularity::Year,
        _ => Granularity::Day,
    }
}

// ============================================================================
// Data Loading
// ============================================================================

/// Fetch contacts and leads from the configured spreadsheet endpoints
pub async fn load_records(config: &Config) -> Result<RecordSet, CommandError> {
    let client = SpreadsheetClient::from_config(config)?;
    let records = client.fetch_all().await?;
    Ok(records)
}

// ============================================================================
// Dashboard Commands
// ============================================================================

/// Build the main dashboard summary
///
/// Origin and county breakdowns count contacts; the service breakdown counts
/// leads. Unknown values are left out of all three, and county also drops
/// the configured noise values.
pub fn get_dashboard_summary(
    records: &RecordSet,
    query: &DashboardQuery,
    now: NaiveDateTime,
    config: &Config,
) -> DashboardSummary {
    let contact_policy = TimestampPolicy::Registration;
    let lead_policy = TimestampPolicy::LeadContact;

    let earliest = [
        earliest_timestamp(&records.contacts, contact_policy),
        earliest_timestamp(&records.leads, lead_policy),
    ]
    .into_iter()
    .flatten()
    .min();
    let window = PeriodWindow::resolve(query, now, earliest);

    let (contacts, previous_contacts) = window.split(&records.contacts, contact_policy);
    let (leads, previous_leads) = window.split(&records.leads, lead_policy);

    let known = CategoryOptions::excluding_unknown();
    let county_options = CategoryOptions {
        exclude_unknown: true,
        ..config.county_options()
    };

    let origin = breakdown(&contacts, previous_contacts.as_ref(), CategoryField::Origin, &known);
    let county = breakdown(&contacts, previous_contacts.as_ref(), CategoryField::County, &county_options);
    let service = breakdown(&leads, previous_leads.as_ref(), CategoryField::Service, &known);

    let lead_ratio = if contacts.is_empty() {
        0.0
    } else {
        leads.len() as f64 / contacts.len() as f64 * 100.0
    };

    let contact_trend = trend_series(
        contacts.iter().copied(),
        &window.current,
        contact_policy,
        query.granularity_override(),
    );

    tracing::debug!(
        "Dashboard summary for {}: {} contacts, {} leads",
        window.label,
        contacts.len(),
        leads.len()
    );

    DashboardSummary {
        contacts: TotalSummary::new(contacts.len(), previous_contacts.as_ref().map(Vec::len)),
        leads: TotalSummary::new(leads.len(), previous_leads.as_ref().map(Vec::len)),
        lead_ratio,
        origin_shares: categories::shares(&origin),
        origin,
        county,
        service,
        contact_trend,
        period: window,
    }
}

/// Breakdown of one categorical field, current vs previous period
pub fn get_category_breakdown(
    records: &[Record],
    query: &DashboardQuery,
    now: NaiveDateTime,
    policy: TimestampPolicy,
    field: CategoryField,
    options: &CategoryOptions,
) -> CategoryBreakdown {
    let window = PeriodWindow::resolve(query, now, earliest_timestamp(records, policy));
    let (current, previous) = window.split(records, policy);

    let rows = breakdown(&current, previous.as_ref(), field, options);

    CategoryBreakdown {
        shares: categories::shares(&rows),
        period: window,
        field,
        rows,
    }
}

/// Zero-filled trend series for the period and its comparison period
///
/// The previous series reuses the current series' granularity.
pub fn get_trend(
    records: &[Record],
    query: &DashboardQuery,
    now: NaiveDateTime,
    policy: TimestampPolicy,
) -> TrendComparison {
    let window = PeriodWindow::resolve(query, now, earliest_timestamp(records, policy));

    let current = trend_series(records, &window.current, policy, query.granularity_override());
    let previous = window
        .previous
        .as_ref()
        .map(|interval| trend_series(records, interval, policy, Some(current.granularity)));

    TrendComparison {
        period: window,
        current,
        previous,
    }
}

/// Conversion figures for the leads in the period
pub fn get_conversion_summary(
    leads: &[Record],
    query: &DashboardQuery,
    now: NaiveDateTime,
    config: &Config,
) -> ConversionReport {
    let policy = TimestampPolicy::LeadContact;
    let vocabulary = config.vocabulary();

    let window = PeriodWindow::resolve(query, now, earliest_timestamp(leads, policy));
    let (current, previous) = window.split(leads, policy);

    let summary = ConversionSummary::from_leads(
        current.iter().copied(),
        previous.as_ref().map(|p| p.iter().copied()),
        &vocabulary,
    );
    let trend = conversion_trend(
        current.iter().copied(),
        &window.current,
        &vocabulary,
        query.granularity_override(),
    );

    ConversionReport {
        period: window,
        summary,
        trend,
    }
}

/// Per-unit registration history ending with the unit containing `now`
///
/// The unit comes from the query's granularity, else from the period.
pub fn get_registration_history(
    records: &[Record],
    query: &DashboardQuery,
    now: NaiveDateTime,
    policy: TimestampPolicy,
) -> Vec<Bucket> {
    let unit = query
        .granularity_override()
        .unwrap_or_else(|| history_unit(&query.selector()));

    registration_history(
        records,
        policy,
        unit,
        now,
        query.adjust_comparisons,
        DEFAULT_HISTORY_PERIODS,
    )
}

// ============================================================================
// Export Commands
// ============================================================================

fn build_export_path(dir: Option<&Path>, prefix: &str, format: ExportFormat) -> PathBuf {
    let dir = dir.map(Path::to_path_buf).unwrap_or_else(get_export_directory);
    dir.join(generate_export_filename(prefix, format.extension()))
}

/// Export a category breakdown; returns the written file path
pub fn export_category_breakdown(
    records: &[Record],
    query: &DashboardQuery,
    now: NaiveDateTime,
    policy: TimestampPolicy,
    field: CategoryField,
    options: &CategoryOptions,
    format: &str,
    dir: Option<&Path>,
) -> Result<String, CommandError> {
    let export_format = format.parse::<ExportFormat>()?;
    let breakdown = get_category_breakdown(records, query, now, policy, field, options);

    let prefix = format!("leadpulse_{}", field.name());
    let export_path = build_export_path(dir, &prefix, export_format);

    match export_format {
        ExportFormat::Csv => csv_export::write_category_csv(&breakdown.rows, &export_path)?,
        ExportFormat::Json => {
            let title = format!("{} ({})", prefix, breakdown.period.label);
            json_export::write_category_json(&breakdown.rows, &title, &export_path)?
        }
    }

    tracing::info!(
        "Exported {} category rows to {}",
        breakdown.rows.len(),
        export_path.display()
    );

    Ok(export_path.to_string_lossy().to_string())
}

/// Export the current trend series; returns the written file path
pub fn export_trend(
    records: &[Record],
    query: &DashboardQuery,
    now: NaiveDateTime,
    policy: TimestampPolicy,
    format: &str,
    dir: Option<&Path>,
) -> Result<String, CommandError> {
    let export_format = format.parse::<ExportFormat>()?;
    let trend = get_trend(records, query, now, policy);
    let export_path = build_export_path(dir, "leadpulse_trend", export_format);

    match export_format {
        ExportFormat::Csv => csv_export::write_trend_csv(&trend.current, &export_path)?,
        ExportFormat::Json => json_export::write_trend_json(&trend.current, &export_path)?,
    }

    tracing::info!(
        "Exported {} trend buckets to {}",
        trend.current.buckets.len(),
        export_path.display()
    );

    Ok(export_path.to_string_lossy().to_string())
}
