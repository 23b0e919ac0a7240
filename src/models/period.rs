//! Reporting period types

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::period::calendar::is_supported;

/// User-selected reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PeriodSelector {
    Today,
    Last7Days,
    Last30Days,
    Last60Days,
    Last12Months,
    ThisWeek,
    ThisMonth,
    ThisYear,
    AllTime,
    Custom { from: NaiveDate, to: NaiveDate },
}

impl Default for PeriodSelector {
    fn default() -> Self {
        PeriodSelector::Today
    }
}

impl From<&str> for PeriodSelector {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "today" => PeriodSelector::Today,
            "7days" | "last7days" | "last_7_days" => PeriodSelector::Last7Days,
            "30days" | "last30days" | "last_30_days" => PeriodSelector::Last30Days,
            "60days" | "last60days" | "last_60_days" => PeriodSelector::Last60Days,
            "12months" | "last12months" | "last_12_months" => PeriodSelector::Last12Months,
            "week" | "thisweek" | "this_week" => PeriodSelector::ThisWeek,
            "month" | "thismonth" | "this_month" => PeriodSelector::ThisMonth,
            "year" | "thisyear" | "this_year" => PeriodSelector::ThisYear,
            "all" | "alltime" | "all_time" => PeriodSelector::AllTime,
            other => {
                tracing::warn!("Unrecognized period selector {:?}, falling back to today", other);
                PeriodSelector::Today
            }
        }
    }
}

impl PeriodSelector {
    /// Build a selector from a period name and optional custom bounds
    ///
    /// `custom` needs both bounds inside the supported years; anything else
    /// falls back to `Today`.
    pub fn from_parts(name: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        if name.trim().eq_ignore_ascii_case("custom") {
            return match (from, to) {
                (Some(from), Some(to)) if is_supported(from) && is_supported(to) => {
                    PeriodSelector::Custom { from, to }
                }
                _ => {
                    tracing::warn!("Custom period without usable bounds, falling back to today");
                    PeriodSelector::Today
                }
            };
        }
        PeriodSelector::from(name)
    }

    /// Number of days for rolling windows
    pub fn rolling_days(&self) -> Option<i64> {
        match self {
            PeriodSelector::Last7Days => Some(7),
            PeriodSelector::Last30Days => Some(30),
            PeriodSelector::Last60Days => Some(60),
            _ => None,
        }
    }

    /// Whether the previous period is the prior calendar unit
    pub fn is_calendar_unit(&self) -> bool {
        matches!(
            self,
            PeriodSelector::ThisWeek | PeriodSelector::ThisMonth | PeriodSelector::ThisYear
        )
    }

    pub fn label(&self) -> String {
        match self {
            PeriodSelector::Today => "Today".to_string(),
            PeriodSelector::Last7Days => "Last 7 Days".to_string(),
            PeriodSelector::Last30Days => "Last 30 Days".to_string(),
            PeriodSelector::Last60Days => "Last 60 Days".to_string(),
            PeriodSelector::Last12Months => "Last 12 Months".to_string(),
            PeriodSelector::ThisWeek => "This Week".to_string(),
            PeriodSelector::ThisMonth => "This Month".to_string(),
            PeriodSelector::ThisYear => "This Year".to_string(),
            PeriodSelector::AllTime => "All Time".to_string(),
            PeriodSelector::Custom { from, to } => {
                format!("{} - {}", from.format("%d/%m/%Y"), to.format("%d/%m/%Y"))
            }
        }
    }
}

/// Inclusive time interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// Create an interval, swapping reversed bounds
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    /// Span in fractional days
    pub fn span_days(&self) -> f64 {
        self.span().num_milliseconds() as f64 / 86_400_000.0
    }

    /// Number of calendar days touched by the interval
    pub fn calendar_days(&self) -> i64 {
        (self.end.date() - self.start.date()).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_selector_from_str() {
        assert_eq!(PeriodSelector::from("today"), PeriodSelector::Today);
        assert_eq!(PeriodSelector::from("7days"), PeriodSelector::Last7Days);
        assert_eq!(PeriodSelector::from("30DAYS"), PeriodSelector::Last30Days);
        assert_eq!(PeriodSelector::from("last_60_days"), PeriodSelector::Last60Days);
        assert_eq!(PeriodSelector::from("12months"), PeriodSelector::Last12Months);
        assert_eq!(PeriodSelector::from("week"), PeriodSelector::ThisWeek);
        assert_eq!(PeriodSelector::from("month"), PeriodSelector::ThisMonth);
        assert_eq!(PeriodSelector::from("year"), PeriodSelector::ThisYear);
        assert_eq!(PeriodSelector::from("all"), PeriodSelector::AllTime);
        assert_eq!(PeriodSelector::from("fortnight"), PeriodSelector::Today);
        assert_eq!(PeriodSelector::from(""), PeriodSelector::Today);
    }

    #[test]
    fn test_selector_from_parts_custom() {
        let from = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();

        assert_eq!(
            PeriodSelector::from_parts("custom", Some(from), Some(to)),
            PeriodSelector::Custom { from, to }
        );
        assert_eq!(PeriodSelector::from_parts("custom", Some(from), None), PeriodSelector::Today);
        assert_eq!(PeriodSelector::from_parts("30days", None, None), PeriodSelector::Last30Days);
    }

    #[test]
    fn test_from_parts_rejects_out_of_range_custom_bounds() {
        let from = NaiveDate::from_ymd_opt(-262143, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(PeriodSelector::from_parts("custom", Some(from), Some(to)), PeriodSelector::Today);
    }

    #[test]
    fn test_interval_new_swaps_reversed_bounds() {
        let a = dt(2024, 5, 1, 0, 0);
        let b = dt(2024, 5, 3, 0, 0);
        let interval = Interval::new(b, a);
        assert_eq!(interval.start, a);
        assert_eq!(interval.end, b);
    }

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(dt(2024, 5, 1, 0, 0), dt(2024, 5, 3, 0, 0));
        assert!(interval.contains(dt(2024, 5, 1, 0, 0)));
        assert!(interval.contains(dt(2024, 5, 3, 0, 0)));
        assert!(!interval.contains(dt(2024, 5, 3, 0, 1)));
    }

    #[test]
    fn test_interval_spans() {
        let interval = Interval::new(dt(2024, 5, 1, 0, 0), dt(2024, 5, 3, 12, 0));
        assert!((interval.span_days() - 2.5).abs() < 1e-9);
        assert_eq!(interval.calendar_days(), 3);
    }

    #[test]
    fn test_selector_labels() {
        assert_eq!(PeriodSelector::Last7Days.label(), "Last 7 Days");
        let custom = PeriodSelector::Custom {
            from: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        };
        assert_eq!(custom.label(), "01/05/2024 - 10/05/2024");
    }

    #[test]
    fn test_selector_serialization() {
        let custom = PeriodSelector::Custom {
            from: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        };
        let json = serde_json::to_string(&custom).unwrap();
        assert!(json.contains("\"kind\":\"custom\""));
        assert!(json.contains("\"from\":\"2024-05-01\""));
        assert!(json.contains("\"to\":\"2024-05-10\""));
    }
}
