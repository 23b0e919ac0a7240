//! Bucket generation and aggregation
//!
//! Builds contiguous, zero-filled bucket sequences and counts records into
//! them by truncating each record's timestamp to the bucket unit.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::{granularity_for, Bucket, Granularity, TrendSeries};
use crate::filter::{filter, record_timestamp};
use crate::models::{Interval, Record, TimestampPolicy};
use crate::period::calendar;

/// One empty bucket per unit from the start's unit through the end's unit
pub fn generate_buckets(interval: &Interval, granularity: Granularity) -> Vec<Bucket> {
    let last = interval.end.date();
    let mut current = calendar::truncate(interval.start.date(), granularity);
    let mut buckets = Vec::new();

    while current <= last {
        buckets.push(Bucket::new(current, granularity));
        current = calendar::next_unit(current, granularity);
    }

    buckets
}

/// Count records into the given buckets
///
/// Records are matched on their truncated timestamp; records without a
/// timestamp or outside every bucket are dropped, so callers should filter
/// to the buckets' interval first.
pub fn aggregate<'a, I>(
    mut buckets: Vec<Bucket>,
    records: I,
    policy: TimestampPolicy,
    granularity: Granularity,
) -> Vec<Bucket>
where
    I: IntoIterator<Item = &'a Record>,
{
    let index: HashMap<NaiveDate, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (b.boundary, i))
        .collect();

    for record in records {
        let Some(ts) = record_timestamp(record, policy) else {
            continue;
        };
        let boundary = calendar::truncate(ts.date(), granularity);
        if let Some(&i) = index.get(&boundary) {
            buckets[i].count += 1;
        }
    }

    buckets
}

/// Filter, bucket and count records over an interval
///
/// Granularity follows `granularity_for` unless overridden.
pub fn trend_series<'a, I>(
    records: I,
    interval: &Interval,
    policy: TimestampPolicy,
    granularity: Option<Granularity>,
) -> TrendSeries
where
    I: IntoIterator<Item = &'a Record>,
{
    let granularity = granularity.unwrap_or_else(|| granularity_for(interval));
    let in_range = filter(records, interval, policy);
    let buckets = aggregate(
        generate_buckets(interval, granularity),
        in_range.iter().copied(),
        policy,
        granularity,
    );

    TrendSeries::new(granularity, *interval, buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordKind;
    use crate::period::calendar::{end_of_day, start_of_day};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days(first: NaiveDate, last: NaiveDate) -> Interval {
        Interval::new(start_of_day(first), end_of_day(last))
    }

    fn contact(registered: &str) -> Record {
        let mut record = Record::new(RecordKind::Contact);
        record.dataregisto = Some(registered.to_string());
        record
    }

    fn assert_contiguous(buckets: &[Bucket], interval: &Interval, granularity: Granularity) {
        assert!(!buckets.is_empty());
        assert_eq!(
            buckets[0].boundary,
            calendar::truncate(interval.start.date(), granularity)
        );
        for pair in buckets.windows(2) {
            assert!(pair[0].boundary < pair[1].boundary);
            assert_eq!(calendar::next_unit(pair[0].boundary, granularity), pair[1].boundary);
        }
        let last = buckets.last().unwrap();
        assert_eq!(last.boundary, calendar::truncate(interval.end.date(), granularity));
    }

    #[test]
    fn test_daily_buckets_count() {
        let interval = days(date(2024, 4, 29), date(2024, 5, 5));
        let buckets = generate_buckets(&interval, Granularity::Day);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].key, "2024-04-29");
        assert_eq!(buckets[6].key, "2024-05-05");
        assert!(buckets.iter().all(|b| b.count == 0));
        assert_contiguous(&buckets, &interval, Granularity::Day);
    }

    #[test]
    fn test_bucket_count_matches_span() {
        let intervals = [
            days(date(2024, 5, 5), date(2024, 5, 5)),
            days(date(2024, 3, 7), date(2024, 5, 5)),
            days(date(2023, 12, 25), date(2024, 1, 8)),
            days(date(2024, 2, 1), date(2024, 3, 1)),
        ];
        for interval in intervals.iter() {
            let buckets = generate_buckets(interval, Granularity::Day);
            let span = (interval.end.date() - interval.start.date()).num_days();
            assert_eq!(buckets.len() as i64, span + 1);
            assert_contiguous(&buckets, interval, Granularity::Day);
        }
    }

    #[test]
    fn test_monthly_buckets_include_partial_units() {
        let interval = days(date(2023, 6, 5), date(2024, 5, 5));
        let buckets = generate_buckets(&interval, Granularity::Month);
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].key, "2023-06");
        assert_eq!(buckets[11].key, "2024-05");
        assert_contiguous(&buckets, &interval, Granularity::Month);
    }

    #[test]
    fn test_yearly_and_weekly_buckets() {
        let interval = days(date(2019, 8, 1), date(2024, 5, 5));
        let years = generate_buckets(&interval, Granularity::Year);
        let keys: Vec<&str> = years.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["2019", "2020", "2021", "2022", "2023", "2024"]);

        // Wednesday to Wednesday, two weeks later
        let interval = days(date(2024, 5, 1), date(2024, 5, 15));
        let weeks = generate_buckets(&interval, Granularity::Week);
        assert_eq!(weeks.len(), 3);
        assert_eq!(weeks[0].boundary, date(2024, 4, 28));
        assert_contiguous(&weeks, &interval, Granularity::Week);
    }

    #[test]
    fn test_aggregate_scenario() {
        let records = vec![
            contact("2024-05-01T09:00:00Z"),
            contact("2024-05-02T12:00:00Z"),
            contact("2024-05-03T18:00:00Z"),
            contact("2024-04-01T09:00:00Z"),
            contact("2024-04-27T09:00:00Z"),
            contact("2024-05-06T09:00:00Z"),
            contact("2023-05-02T09:00:00Z"),
            contact("2025-05-02T09:00:00Z"),
            contact("bogus"),
            contact(""),
        ];
        let interval = days(date(2024, 4, 29), date(2024, 5, 5));

        let in_range = filter(&records, &interval, TimestampPolicy::Registration);
        assert_eq!(in_range.len(), 3);

        let buckets = aggregate(
            generate_buckets(&interval, Granularity::Day),
            in_range.iter().copied(),
            TimestampPolicy::Registration,
            Granularity::Day,
        );
        let counts: Vec<u32> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![0, 0, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_aggregate_conserves_filtered_records() {
        let records: Vec<Record> = (0..45)
            .map(|i| {
                let day = date(2024, 1, 1) + chrono::Duration::days(i * 7);
                contact(&format!("{}T10:00:00Z", day.format("%Y-%m-%d")))
            })
            .collect();
        let interval = days(date(2024, 1, 1), date(2024, 12, 31));

        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month, Granularity::Year] {
            let in_range = filter(&records, &interval, TimestampPolicy::Registration);
            let buckets = aggregate(
                generate_buckets(&interval, granularity),
                in_range.iter().copied(),
                TimestampPolicy::Registration,
                granularity,
            );
            let total: u32 = buckets.iter().map(|b| b.count).sum();
            assert_eq!(total as usize, in_range.len(), "{:?}", granularity);
        }
    }

    #[test]
    fn test_aggregate_drops_unmatched_records() {
        let records = vec![contact("2024-06-01T10:00:00Z")];
        let interval = days(date(2024, 5, 1), date(2024, 5, 3));
        let buckets = aggregate(
            generate_buckets(&interval, Granularity::Day),
            &records,
            TimestampPolicy::Registration,
            Granularity::Day,
        );
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u32>(), 0);
    }

    #[test]
    fn test_trend_series_auto_granularity() {
        let records = vec![
            contact("2024-01-15T10:00:00Z"),
            contact("2024-01-20T10:00:00Z"),
            contact("2024-03-02T10:00:00Z"),
        ];
        let interval = days(date(2024, 1, 1), date(2024, 12, 31));

        let series = trend_series(&records, &interval, TimestampPolicy::Registration, None);
        assert_eq!(series.granularity, Granularity::Month);
        assert_eq!(series.buckets.len(), 12);
        assert_eq!(series.buckets[0].count, 2);
        assert_eq!(series.buckets[2].count, 1);
        assert_eq!(series.total, 3);

        let daily = trend_series(&records, &interval, TimestampPolicy::Registration, Some(Granularity::Day));
        assert_eq!(daily.buckets.len(), 366);
    }

    #[test]
    fn test_trend_series_is_idempotent() {
        let records = vec![contact("2024-05-01T09:00:00Z"), contact("2024-05-03T09:00:00Z")];
        let interval = days(date(2024, 4, 29), date(2024, 5, 5));

        let first = trend_series(&records, &interval, TimestampPolicy::Registration, None);
        let second = trend_series(&records, &interval, TimestampPolicy::Registration, None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_trend_series_empty_records_zero_filled() {
        let records: Vec<Record> = vec![];
        let interval = days(date(2024, 4, 29), date(2024, 5, 5));
        let series = trend_series(&records, &interval, TimestampPolicy::Registration, None);
        assert_eq!(series.buckets.len(), 7);
        assert!(series.is_empty());
    }
}
