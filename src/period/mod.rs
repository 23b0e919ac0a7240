//! Period resolution
//!
//! Turns a reporting selector and an explicit `now` into the current
//! interval and the comparable previous interval:
//! - Rolling day windows compare against the window of the same length
//!   ending N + 1 days ago; the last 12 months against months 13 to 24 back
//! - Today and custom ranges compare against the adjacent window of the
//!   same length
//! - Calendar units compare against the prior unit, optionally truncated
//!   to the same elapsed offset as `now` ("adjusted comparisons")
//! - All-time has no previous period

pub mod calendar;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::models::{Interval, PeriodSelector};
use crate::trends::Granularity;
use calendar::{end_of_day, start_of_day};

/// Resolve the interval covered by the selector at `now`
///
/// `earliest` is the earliest record timestamp and is only used by
/// `AllTime`; without one the interval collapses to `now`.
pub fn resolve_current(
    selector: &PeriodSelector,
    now: NaiveDateTime,
    earliest: Option<NaiveDateTime>,
) -> Interval {
    let today = now.date();

    match *selector {
        PeriodSelector::Today => whole_days(today, today),
        PeriodSelector::Last7Days | PeriodSelector::Last30Days | PeriodSelector::Last60Days => {
            let days = selector.rolling_days().unwrap_or(1);
            whole_days(today - Duration::days(days - 1), today)
        }
        PeriodSelector::Last12Months => whole_days(calendar::shift_months(today, -11), today),
        PeriodSelector::ThisWeek => calendar_unit(today, Granularity::Week),
        PeriodSelector::ThisMonth => calendar_unit(today, Granularity::Month),
        PeriodSelector::ThisYear => calendar_unit(today, Granularity::Year),
        PeriodSelector::AllTime => {
            let start = earliest.map(|e| e.min(now)).unwrap_or(now);
            Interval::new(start, now)
        }
        PeriodSelector::Custom { from, to } => whole_days(from.min(to), from.max(to)),
    }
}

/// Resolve the comparison interval preceding the current one
///
/// Returns `None` for `AllTime`, which has nothing to compare against.
pub fn resolve_previous(
    selector: &PeriodSelector,
    now: NaiveDateTime,
    adjust: bool,
) -> Option<Interval> {
    let today = now.date();

    let unit = match selector {
        PeriodSelector::AllTime => return None,
        PeriodSelector::ThisWeek => Some(Granularity::Week),
        PeriodSelector::ThisMonth => Some(Granularity::Month),
        PeriodSelector::ThisYear => Some(Granularity::Year),
        _ => None,
    };

    if let Some(unit) = unit {
        let previous_start = calendar::previous_unit(today, unit);
        let end = if adjust {
            adjusted_cutoff(previous_start, unit, now)
        } else {
            end_of_day(calendar::unit_end(previous_start, unit))
        };
        return Some(Interval::new(start_of_day(previous_start), end));
    }

    let previous = match *selector {
        PeriodSelector::Last7Days | PeriodSelector::Last30Days | PeriodSelector::Last60Days => {
            // The N days ending N + 1 days ago
            let days = selector.rolling_days().unwrap_or(1);
            whole_days(today - Duration::days(2 * days), today - Duration::days(days + 1))
        }
        PeriodSelector::Last12Months => whole_days(
            calendar::shift_months(today, -24),
            calendar::shift_months(today, -13),
        ),
        // Today and custom ranges: same number of calendar days, ending the
        // day before the current start
        _ => {
            let current = resolve_current(selector, now, None);
            let days = current.calendar_days();
            let current_start = current.start.date();
            whole_days(
                current_start - Duration::days(days),
                current_start - Duration::days(1),
            )
        }
    };

    Some(previous)
}

/// End of the day in `unit_start`'s unit at the same offset `now` has in its own unit
///
/// Week offsets count from Sunday, month offsets are the day of the month
/// and year offsets the day of the year. Offsets past the end of a shorter
/// unit clamp to its last day.
pub fn adjusted_cutoff(unit_start: NaiveDate, unit: Granularity, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date();
    let start = calendar::truncate(unit_start, unit);

    let cutoff = match unit {
        Granularity::Day => start,
        Granularity::Week => start + Duration::days(today.weekday().num_days_from_sunday() as i64),
        Granularity::Month => {
            let day = today.day().min(calendar::month_end(start).day());
            start + Duration::days(day as i64 - 1)
        }
        Granularity::Year => {
            let ordinal = today.ordinal().min(calendar::year_end(start).ordinal());
            start + Duration::days(ordinal as i64 - 1)
        }
    };

    end_of_day(cutoff)
}

/// Label for the comparison period
///
/// Custom ranges show the dates of the previous range.
pub fn previous_label(selector: &PeriodSelector, now: NaiveDateTime) -> String {
    match selector {
        PeriodSelector::Today => "Yesterday".to_string(),
        PeriodSelector::Last7Days => "Previous 7 Days".to_string(),
        PeriodSelector::Last30Days => "Previous 30 Days".to_string(),
        PeriodSelector::Last60Days => "Previous 60 Days".to_string(),
        PeriodSelector::Last12Months => "Previous 12 Months".to_string(),
        PeriodSelector::ThisWeek => "Previous Week".to_string(),
        PeriodSelector::ThisMonth => "Previous Month".to_string(),
        PeriodSelector::ThisYear => "Previous Year".to_string(),
        PeriodSelector::AllTime => String::new(),
        PeriodSelector::Custom { .. } => resolve_previous(selector, now, false)
            .map(|previous| {
                format!(
                    "{} - {}",
                    previous.start.format("%d/%m/%Y"),
                    previous.end.format("%d/%m/%Y")
                )
            })
            .unwrap_or_default(),
    }
}

fn whole_days(first: NaiveDate, last: NaiveDate) -> Interval {
    Interval::new(start_of_day(first), end_of_day(last))
}

fn calendar_unit(date: NaiveDate, unit: Granularity) -> Interval {
    whole_days(calendar::truncate(date, unit), calendar::unit_end(date, unit))
}
