//! Weekly trend calculations
//!
//! Weeks start on Monday. A week's value is the mean of the days present in
//! it, whatever the metric's policy, so weekly bars stay comparable in
//! magnitude to daily ones.

use chrono::{Datelike, NaiveDate};

use super::daily::format_date;
use super::{group_by_period, AggregationPolicy, Bucket};
use crate::models::DateSeries;

/// Get the Monday of the week containing the given date
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday();
    date - chrono::Duration::days(days_from_monday as i64)
}

/// Get the Sunday of the week containing the given date
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - date.weekday().num_days_from_monday();
    date + chrono::Duration::days(days_to_sunday as i64)
}

/// Display label for a week, e.g. "Feb 2 - Feb 8, 2026"
pub fn week_label(start: NaiveDate) -> String {
    let end = week_end(start);
    format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
}

/// Aggregate a daily series into Monday-start weekly buckets
pub fn aggregate_to_weekly(series: &DateSeries) -> Vec<Bucket> {
    group_by_period(series, AggregationPolicy::Mean, week_start)
        .into_iter()
        .map(|(start, value)| Bucket {
            key: format_date(start),
            label: week_label(start),
            value,
            start,
            end: week_end(start),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start() {
        // Thursday, Feb 5, 2026
        let start = week_start(date(2026, 2, 5));
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(start, date(2026, 2, 2));

        // Monday itself
        assert_eq!(week_start(date(2026, 2, 2)), date(2026, 2, 2));

        // Sunday belongs to the preceding Monday
        assert_eq!(week_start(date(2026, 2, 8)), date(2026, 2, 2));
    }

    #[test]
    fn test_week_end() {
        let end = week_end(date(2026, 2, 5));
        assert_eq!(end.weekday(), Weekday::Sun);
        assert_eq!(end, date(2026, 2, 8));
        assert_eq!(week_end(date(2026, 2, 8)), date(2026, 2, 8));
    }

    #[test]
    fn test_week_label_spanning_years() {
        assert_eq!(week_label(date(2026, 2, 2)), "Feb 2 - Feb 8, 2026");
        assert_eq!(week_label(date(2025, 12, 29)), "Dec 29 - Jan 4, 2026");
    }

    #[test]
    fn test_aggregate_to_weekly_uses_mean_of_present_days() {
        let series: DateSeries = [
            (date(2026, 2, 2), 10.0), // Monday
            (date(2026, 2, 3), 20.0), // Tuesday
            (date(2026, 2, 8), 30.0), // Sunday
            (date(2026, 2, 9), 5.0),  // Next Monday
        ]
        .into_iter()
        .collect();

        let weekly = aggregate_to_weekly(&series);
        assert_eq!(weekly.len(), 2);

        assert_eq!(weekly[0].key, "2026-02-02");
        assert_eq!(weekly[0].end, date(2026, 2, 8));
        assert_eq!(weekly[0].value, 20.0);

        assert_eq!(weekly[1].key, "2026-02-09");
        assert_eq!(weekly[1].value, 5.0);
    }
}
