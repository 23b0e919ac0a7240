//! Record filtering by interval
//!
//! Extracts a timestamp from each record according to a `TimestampPolicy`
//! and keeps the records falling inside an inclusive interval. Records with
//! a missing or unparseable timestamp are excluded, never defaulted.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::{Interval, Record, TimestampPolicy};
use crate::period::calendar::{is_supported, start_of_day};

/// Naive layouts accepted after RFC 3339 fails
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp
///
/// Handles formats like:
/// - "2024-05-01T10:30:00.000Z" (normalized to UTC)
/// - "2024-05-01T10:30:00+01:00" (normalized to UTC)
/// - "2024-05-01T10:30:00"
/// - "2024-05-01" (midnight)
///
/// Years outside `SUPPORTED_YEARS` are rejected.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    parse_any(raw.trim()).filter(|ts| is_supported(ts.date()))
}

fn parse_any(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(start_of_day)
}

/// Timestamp of a record under the given policy
pub fn record_timestamp(record: &Record, policy: TimestampPolicy) -> Option<NaiveDateTime> {
    let raw = policy.select(record)?;
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        tracing::debug!(
            "Invalid date string for record {}: {:?}",
            record.id.as_deref().unwrap_or("<no id>"),
            raw
        );
    }
    parsed
}

/// Keep the records whose timestamp lies inside `interval` (inclusive)
pub fn filter<'a, I>(records: I, interval: &Interval, policy: TimestampPolicy) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| {
            record_timestamp(record, policy)
                .map(|ts| interval.contains(ts))
                .unwrap_or(false)
        })
        .collect()
}

/// Earliest valid timestamp across the records
pub fn earliest_timestamp<'a, I>(records: I, policy: TimestampPolicy) -> Option<NaiveDateTime>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter_map(|record| record_timestamp(record, policy))
        .min()
}
