//! Daily trend calculations
//!
//! Date parsing, range filtering and the daily pass-through.

use chrono::NaiveDate;

use super::Bucket;
use crate::models::DateSeries;

/// Parse a date string in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

/// Format a date as YYYY-MM-DD
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Display label for a single day, e.g. "Feb 5, 2026"
pub fn day_label(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Filter a series by an inclusive date range; open bounds are unbounded
pub fn filter_by_date_range(
    series: &DateSeries,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> DateSeries {
    series
        .iter()
        .filter(|(date, _)| {
            let after_start = match start_date {
                Some(s) => **date >= s,
                None => true,
            };

            let before_end = match end_date {
                Some(e) => **date <= e,
                None => true,
            };

            after_start && before_end
        })
        .map(|(date, value)| (*date, *value))
        .collect()
}

/// One bucket per present day
pub fn aggregate_to_daily(series: &DateSeries) -> Vec<Bucket> {
    series
        .iter()
        .map(|(date, value)| Bucket {
            key: format_date(*date),
            label: day_label(*date),
            value: *value,
            start: *date,
            end: *date,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn five_days() -> DateSeries {
        (1..=5).map(|d| (date(2026, 2, d), d as f64)).collect()
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("2026-02-05").unwrap();
        assert_eq!(d.year(), 2026);
        assert_eq!(d.month(), 2);
        assert_eq!(d.day(), 5);

        assert!(parse_date("invalid").is_none());
        assert!(parse_date("2026-13-45").is_none());
        assert!(parse_date("2025-02-29").is_none());
        assert!(parse_date("2024-02-29").is_some());
    }

    #[test]
    fn test_day_label() {
        assert_eq!(day_label(date(2026, 2, 5)), "Feb 5, 2026");
        assert_eq!(day_label(date(2026, 12, 31)), "Dec 31, 2026");
    }

    #[test]
    fn test_filter_by_date_range() {
        let series = five_days();

        let filtered = filter_by_date_range(&series, Some(date(2026, 2, 2)), Some(date(2026, 2, 4)));
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered.keys().next(), Some(&date(2026, 2, 2)));

        let filtered = filter_by_date_range(&series, Some(date(2026, 2, 3)), None);
        assert_eq!(filtered.len(), 3);

        let filtered = filter_by_date_range(&series, None, Some(date(2026, 2, 2)));
        assert_eq!(filtered.len(), 2);

        let filtered = filter_by_date_range(&series, None, None);
        assert_eq!(filtered.len(), 5);
    }

    #[test]
    fn test_aggregate_to_daily_is_pass_through() {
        let buckets = aggregate_to_daily(&five_days());
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].key, "2026-02-01");
        assert_eq!(buckets[0].label, "Feb 1, 2026");
        assert_eq!(buckets[4].value, 5.0);
        assert_eq!(buckets[4].start, buckets[4].end);
    }
}
