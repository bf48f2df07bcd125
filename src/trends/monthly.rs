//! Monthly trend calculations
//!
//! Aggregates a daily series into calendar months.

use chrono::{Datelike, NaiveDate};

use super::{group_by_period, AggregationPolicy, Bucket};
use crate::models::DateSeries;

/// Get the month identifier (YYYY-MM) for a date
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Display label for a month, e.g. "February 2026"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
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
    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

/// Aggregate a daily series into calendar months
pub fn aggregate_to_monthly(series: &DateSeries, policy: AggregationPolicy) -> Vec<Bucket> {
    group_by_period(series, policy, month_start)
        .into_iter()
        .map(|(start, value)| Bucket {
            key: month_key(start),
            label: month_label(start),
            value,
            start,
            end: month_end(start),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key(date(2026, 2, 5)), "2026-02");
        assert_eq!(month_key(date(2026, 12, 31)), "2026-12");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(date(2026, 2, 5)), "February 2026");
    }

    #[test]
    fn test_month_start_end() {
        let d = date(2026, 2, 15);
        assert_eq!(month_start(d), date(2026, 2, 1));
        assert_eq!(month_end(d), date(2026, 2, 28));

        // December edge case
        assert_eq!(month_end(date(2026, 12, 15)), date(2026, 12, 31));

        // Leap year February
        assert_eq!(month_end(date(2024, 2, 15)), date(2024, 2, 29));
    }

    #[test]
    fn test_aggregate_to_monthly() {
        let series: DateSeries = [
            (date(2026, 1, 15), 1.0),
            (date(2026, 1, 20), 2.0),
            (date(2026, 2, 5), 0.5),
        ]
        .into_iter()
        .collect();

        let monthly = aggregate_to_monthly(&series, AggregationPolicy::Sum);
        assert_eq!(monthly.len(), 2);

        assert_eq!(monthly[0].key, "2026-01");
        assert_eq!(monthly[0].value, 3.0);
        assert_eq!(monthly[0].start, date(2026, 1, 1));
        assert_eq!(monthly[0].end, date(2026, 1, 31));

        assert_eq!(monthly[1].key, "2026-02");
        assert_eq!(monthly[1].value, 0.5);
    }

    #[test]
    fn test_missing_days_are_not_zero() {
        // Only two days present; mean must divide by 2, not 31
        let series: DateSeries = [(date(2026, 1, 1), 4.0), (date(2026, 1, 31), 8.0)]
            .into_iter()
            .collect();
        let monthly = aggregate_to_monthly(&series, AggregationPolicy::Mean);
        assert_eq!(monthly[0].value, 6.0);
    }
}
