//! Year-over-year alignment
//!
//! Merges a current window with the same window one year earlier and lines
//! up prior-year values with current dates and buckets.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::change::change;
use crate::error::FetchError;
use crate::models::{ComparisonSet, DateSeries, EntityValues, MetricMap, MetricValue};
use crate::trends::{self, daily, AggregationPolicy, Granularity};

const ONE_YEAR: Months = Months::new(12);

/// What a current-window February 29 is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDayPolicy {
    /// Compare against February 28 of the prior year
    AlignToFeb28,
    /// No prior-year value for that day
    Drop,
}

impl Default for LeapDayPolicy {
    fn default() -> Self {
        LeapDayPolicy::AlignToFeb28
    }
}

fn is_leap_day(date: NaiveDate) -> bool {
    date.month() == 2 && date.day() == 29
}

/// The prior-year date a current date is compared against
pub fn shift_back_one_year(date: NaiveDate, policy: LeapDayPolicy) -> Option<NaiveDate> {
    if is_leap_day(date) && policy == LeapDayPolicy::Drop {
        return None;
    }
    // checked_sub_months clamps Feb 29 to Feb 28
    date.checked_sub_months(ONE_YEAR)
}

/// The `[start, end]` window one year earlier.
///
/// Bounds falling on February 29 clamp to February 28 so the window never
/// loses its last day.
pub fn previous_window(start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    Some((start.checked_sub_months(ONE_YEAR)?, end.checked_sub_months(ONE_YEAR)?))
}

/// Merge a current window with its prior-year window.
///
/// Each entity's `previous` comes from the same entity's `current` in the
/// prior-year map. Competitors absent from the current window stay absent.
/// A failed prior-year fetch still yields the current data, with the
/// failure kept as a soft error.
pub fn merge_windows(current: MetricMap, previous: Result<MetricMap, FetchError>) -> ComparisonSet {
    let (previous, previous_error) = match previous {
        Ok(map) => (map, None),
        Err(e) => {
            tracing::warn!("Previous-year data unavailable: {}", e);
            (MetricMap::new(), Some(e.to_string()))
        }
    };

    let metrics = current
        .into_iter()
        .map(|(id, mut metric)| {
            if let Some(prior) = previous.get(&id) {
                metric.merchant.previous = Some(prior.merchant.current.clone());
                if let Some(competitor) = metric.competitor.as_mut() {
                    competitor.previous = prior.competitor.as_ref().map(|c| c.current.clone());
                }
            }
            (id, metric)
        })
        .collect();

    ComparisonSet {
        metrics,
        previous_error,
    }
}

impl EntityValues {
    /// Prior-year value for a current-window date of a series metric
    pub fn previous_on(&self, date: NaiveDate, policy: LeapDayPolicy) -> Option<f64> {
        let series = self.previous.as_ref()?.as_series()?;
        let prior = shift_back_one_year(date, policy)?;
        series.get(&prior).copied()
    }
}

/// Re-key a prior-year series onto the current year's calendar.
///
/// Every date is moved one year forward. A prior-year February 29 has no
/// current counterpart and is dropped; under [`LeapDayPolicy::AlignToFeb28`]
/// a current February 29 repeats the prior February 28.
pub fn align_previous_series(previous: &DateSeries, policy: LeapDayPolicy) -> DateSeries {
    let mut aligned = DateSeries::new();

    for (date, value) in previous {
        if is_leap_day(*date) {
            continue;
        }
        let Some(forward) = date.checked_add_months(ONE_YEAR) else {
            continue;
        };
        aligned.insert(forward, *value);

        if policy == LeapDayPolicy::AlignToFeb28 && date.month() == 2 && date.day() == 28 {
            if let Some(leap_day) = NaiveDate::from_ymd_opt(forward.year(), 2, 29) {
                aligned.insert(leap_day, *value);
            }
        }
    }

    aligned
}

/// One bucket of the current year next to the same bucket a year earlier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketChange {
    pub key: String,
    pub label: String,
    pub current: f64,
    pub previous: Option<f64>,
    pub percent_change: Option<f64>,
}

/// Year-over-year change per bucket of a series metric.
///
/// Days and weeks are compared against the prior-year series moved onto the
/// current calendar. Months, quarters and years are compared against the
/// same calendar period one year earlier. Returns an empty list for
/// non-series metrics.
pub fn bucket_changes(
    entity: &EntityValues,
    granularity: Granularity,
    policy: AggregationPolicy,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    leap_policy: LeapDayPolicy,
) -> Vec<BucketChange> {
    let Some(current) = entity.current.as_series() else {
        return Vec::new();
    };
    let buckets = trends::aggregate(current, granularity, policy, start_date, end_date);

    let previous_by_start: HashMap<NaiveDate, f64> = entity
        .previous
        .as_ref()
        .and_then(MetricValue::as_series)
        .map(|prior| previous_buckets(prior, granularity, policy, start_date, end_date, leap_policy))
        .unwrap_or_default();

    buckets
        .into_iter()
        .map(|bucket| {
            let result = change(bucket.value, previous_by_start.get(&bucket.start).copied());
            BucketChange {
                key: bucket.key,
                label: bucket.label,
                current: result.current,
                previous: result.previous,
                percent_change: result.percent_change,
            }
        })
        .collect()
}

/// Prior-year bucket values keyed by the matching current bucket's start
fn previous_buckets(
    prior: &DateSeries,
    granularity: Granularity,
    policy: AggregationPolicy,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    leap_policy: LeapDayPolicy,
) -> HashMap<NaiveDate, f64> {
    match granularity {
        Granularity::Daily | Granularity::Weekly => {
            let aligned = align_previous_series(prior, leap_policy);
            let filtered = daily::filter_by_date_range(&aligned, start_date, end_date);
            trends::bucketize(&filtered, granularity, policy)
                .into_iter()
                .map(|b| (b.start, b.value))
                .collect()
        }
        Granularity::Monthly | Granularity::Quarterly | Granularity::Yearly => {
            let prior_start = start_date.and_then(|d| d.checked_sub_months(ONE_YEAR));
            let prior_end = end_date.and_then(|d| d.checked_sub_months(ONE_YEAR));
            let filtered = daily::filter_by_date_range(prior, prior_start, prior_end);
            trends::bucketize(&filtered, granularity, policy)
                .into_iter()
                .filter_map(|b| Some((b.start.checked_add_months(ONE_YEAR)?, b.value)))
                .collect()
        }
    }
}
