//! Rolling registration history
//!
//! A per-unit series ending with the unit containing `now`, used to compare
//! how each past day/week/month/year performed. With adjusted comparisons,
//! each unit only counts records up to the same offset `now` has reached in
//! the current unit.

use super::buckets::{aggregate, generate_buckets};
use super::{Bucket, Granularity};
use crate::filter::{earliest_timestamp, record_timestamp};
use crate::models::{Interval, Record, TimestampPolicy};
use crate::period::{adjusted_cutoff, calendar};

use chrono::NaiveDateTime;

/// Default number of units shown for day/week/month histories
pub const DEFAULT_HISTORY_PERIODS: usize = 20;

/// Build the per-unit history series
///
/// - `Day`/`Week`/`Month`: up to `max_periods` units ending with the current
///   one, stopping at the unit holding the earliest record
/// - `Year`: every year from the earliest record through the current year
pub fn registration_history(
    records: &[Record],
    policy: TimestampPolicy,
    unit: Granularity,
    now: NaiveDateTime,
    adjust: bool,
    max_periods: usize,
) -> Vec<Bucket> {
    let today = now.date();
    let earliest = earliest_timestamp(records, policy)
        .map(|ts| ts.date().min(today))
        .unwrap_or(today);
    let earliest_unit = calendar::truncate(earliest, unit);

    let first_unit = match unit {
        Granularity::Year => earliest_unit,
        _ => {
            let mut start = calendar::truncate(today, unit);
            for _ in 1..max_periods.max(1) {
                let previous = calendar::previous_unit(start, unit);
                if previous < earliest_unit {
                    break;
                }
                start = previous;
            }
            start
        }
    };

    let span = Interval::new(
        calendar::start_of_day(first_unit),
        calendar::end_of_day(today),
    );
    let counted = records.iter().filter(|record| {
        if !adjust || unit == Granularity::Day {
            return true;
        }
        match record_timestamp(record, policy) {
            Some(ts) => ts <= adjusted_cutoff(ts.date(), unit, now),
            None => false,
        }
    });

    aggregate(generate_buckets(&span, unit), counted, policy, unit)
}
