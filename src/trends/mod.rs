//! Trend analysis module
//!
//! This module handles time-bucketed series for trend charts:
//! - Granularity selection from the interval span
//! - Zero-filled, gap-free bucket generation
//! - Record aggregation into buckets
//! - Rolling per-unit history with optional adjusted cutoffs

pub mod buckets;
pub mod history;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Interval;

/// Spans up to this many days are bucketed daily
pub const DAILY_SPAN_LIMIT_DAYS: f64 = 60.0;

/// Spans up to this many days are bucketed monthly; longer spans yearly
pub const MONTHLY_SPAN_LIMIT_DAYS: f64 = 365.0 * 2.0;

/// Bucket time unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Day
    }
}

impl From<&str> for Granularity {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "week" | "weekly" => Granularity::Week,
            "month" | "monthly" => Granularity::Month,
            "year" | "yearly" => Granularity::Year,
            _ => Granularity::Day,
        }
    }
}

impl From<Option<String>> for Granularity {
    fn from(s: Option<String>) -> Self {
        match s {
            Some(val) => Granularity::from(val.as_str()),
            None => Granularity::default(),
        }
    }
}

impl Granularity {
    /// Stable key for a unit boundary
    pub fn key(&self, boundary: NaiveDate) -> String {
        match self {
            Granularity::Day | Granularity::Week => boundary.format("%Y-%m-%d").to_string(),
            Granularity::Month => boundary.format("%Y-%m").to_string(),
            Granularity::Year => boundary.format("%Y").to_string(),
        }
    }

    /// Display label for a unit boundary
    pub fn label(&self, boundary: NaiveDate) -> String {
        match self {
            Granularity::Day | Granularity::Week => boundary.format("%d/%m").to_string(),
            Granularity::Month => boundary.format("%m/%Y").to_string(),
            Granularity::Year => boundary.format("%Y").to_string(),
        }
    }
}

/// Pick the bucket unit for an interval
///
/// Never returns `Week`; weekly series are a caller override.
pub fn granularity_for(interval: &Interval) -> Granularity {
    let span = interval.span_days();
    if span <= DAILY_SPAN_LIMIT_DAYS {
        Granularity::Day
    } else if span <= MONTHLY_SPAN_LIMIT_DAYS {
        Granularity::Month
    } else {
        Granularity::Year
    }
}

/// One time-unit slot in a trend series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// First day of the unit
    pub boundary: NaiveDate,
    /// Boundary key (YYYY-MM-DD, YYYY-MM or YYYY)
    pub key: String,
    pub label: String,
    pub count: u32,
}

impl Bucket {
    /// Create an empty bucket for a unit boundary
    pub fn new(boundary: NaiveDate, granularity: Granularity) -> Self {
        Self {
            boundary,
            key: granularity.key(boundary),
            label: granularity.label(boundary),
            count: 0,
        }
    }
}

/// A zero-filled series over an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub granularity: Granularity,
    pub interval: Interval,
    pub buckets: Vec<Bucket>,
    /// Sum of all bucket counts
    pub total: u32,
}

impl TrendSeries {
    pub fn new(granularity: Granularity, interval: Interval, buckets: Vec<Bucket>) -> Self {
        let total = buckets.iter().map(|b| b.count).sum();
        Self {
            granularity,
            interval,
            buckets,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
