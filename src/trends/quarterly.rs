//! Quarterly trend calculations

use chrono::{Datelike, NaiveDate};

use super::monthly::month_end;
use super::{group_by_period, AggregationPolicy, Bucket};
use crate::models::DateSeries;

/// Calendar quarter (1-4) of a date
pub fn quarter(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// Get the first day of the quarter for a date
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let first_month = (quarter(date) - 1) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
}

/// Get the last day of the quarter for a date
pub fn quarter_end(date: NaiveDate) -> NaiveDate {
    let last_month = quarter(date) * 3;
    NaiveDate::from_ymd_opt(date.year(), last_month, 1)
        .map(month_end)
        .unwrap_or(date)
}

/// Quarter identifier, e.g. "2026-Q1"
pub fn quarter_key(date: NaiveDate) -> String {
    format!("{}-Q{}", date.year(), quarter(date))
}

/// Display label, e.g. "Q1 2026"
pub fn quarter_label(date: NaiveDate) -> String {
    format!("Q{} {}", quarter(date), date.year())
}

/// Aggregate a daily series into calendar quarters
pub fn aggregate_to_quarterly(series: &DateSeries, policy: AggregationPolicy) -> Vec<Bucket> {
    group_by_period(series, policy, quarter_start)
        .into_iter()
        .map(|(start, value)| Bucket {
            key: quarter_key(start),
            label: quarter_label(start),
            value,
            start,
            end: quarter_end(start),
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
    fn test_quarter() {
        assert_eq!(quarter(date(2026, 1, 1)), 1);
        assert_eq!(quarter(date(2026, 3, 31)), 1);
        assert_eq!(quarter(date(2026, 4, 1)), 2);
        assert_eq!(quarter(date(2026, 9, 30)), 3);
        assert_eq!(quarter(date(2026, 12, 31)), 4);
    }

    #[test]
    fn test_quarter_bounds() {
        assert_eq!(quarter_start(date(2026, 5, 17)), date(2026, 4, 1));
        assert_eq!(quarter_end(date(2026, 5, 17)), date(2026, 6, 30));
        assert_eq!(quarter_end(date(2026, 11, 2)), date(2026, 12, 31));
    }

    #[test]
    fn test_aggregate_to_quarterly() {
        let series: DateSeries = [
            (date(2025, 12, 31), 7.0),
            (date(2026, 1, 10), 1.0),
            (date(2026, 3, 10), 2.0),
            (date(2026, 4, 10), 4.0),
        ]
        .into_iter()
        .collect();

        let quarters = aggregate_to_quarterly(&series, AggregationPolicy::Sum);
        assert_eq!(quarters.len(), 3);
        assert_eq!(quarters[0].key, "2025-Q4");
        assert_eq!(quarters[1].key, "2026-Q1");
        assert_eq!(quarters[1].label, "Q1 2026");
        assert_eq!(quarters[1].value, 3.0);
        assert_eq!(quarters[2].value, 4.0);
    }
}
