//! Calendar helpers
//!
//! Day, week, month and year boundaries. Weeks start on Sunday.

use std::ops::RangeInclusive;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::trends::Granularity;

/// Midnight at the start of the given date
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Last representable instant of the given date
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::nanoseconds(1)
}

/// Get the Sunday of the week containing the given date
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_sunday = date.weekday().num_days_from_sunday();
    date - Duration::days(days_from_sunday as i64)
}

/// Get the Saturday of the week containing the given date
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// Years accepted from record data and custom ranges
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

/// Whether the date is inside `SUPPORTED_YEARS`
pub fn is_supported(date: NaiveDate) -> bool {
    SUPPORTED_YEARS.contains(&date.year())
}

/// Get the first day of the month for a date
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Get the last day of the month for a date
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month.and_then(|d| d.pred_opt()).unwrap_or(date)
}

pub fn year_start(date: NaiveDate) -> NaiveDate {
    date.with_ordinal(1).unwrap_or(date)
}

pub fn year_end(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// Shift a date by whole months, clamping the day to the target month's length
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// First day of the unit containing `date`
pub fn truncate(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => week_start(date),
        Granularity::Month => month_start(date),
        Granularity::Year => year_start(date),
    }
}

/// Last day of the unit containing `date`
pub fn unit_end(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => week_end(date),
        Granularity::Month => month_end(date),
        Granularity::Year => year_end(date),
    }
}

/// First day of the unit following the one containing `date`
pub fn next_unit(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    unit_end(date, granularity) + Duration::days(1)
}

/// First day of the unit preceding the one containing `date`
pub fn previous_unit(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    truncate(truncate(date, granularity) - Duration::days(1), granularity)
}
