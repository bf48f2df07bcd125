//! Yearly trend calculations

use chrono::{Datelike, NaiveDate};

use super::{group_by_period, AggregationPolicy, Bucket};
use crate::models::DateSeries;

pub fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn year_end(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// Aggregate a daily series into calendar years
pub fn aggregate_to_yearly(series: &DateSeries, policy: AggregationPolicy) -> Vec<Bucket> {
    group_by_period(series, policy, year_start)
        .into_iter()
        .map(|(start, value)| Bucket {
            key: start.year().to_string(),
            label: start.year().to_string(),
            value,
            start,
            end: year_end(start),
        })
        .collect()
}
