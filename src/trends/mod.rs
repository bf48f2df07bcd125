//! Trend aggregation module
//!
//! Re-buckets a daily [`DateSeries`] into coarser periods:
//! - Daily pass-through
//! - Monday-start weeks (mean of present days)
//! - Calendar months, quarters and years (sum of present days)
//!
//! Days missing from the series are absent, never zero: they count neither
//! toward a sum nor toward a mean's denominator.

pub mod daily;
pub mod monthly;
pub mod quarterly;
pub mod weekly;
pub mod yearly;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::DateSeries;

/// One aggregated period of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Sortable period identifier (e.g. `2026-02`, `2026-Q1`)
    pub key: String,
    /// Display name (e.g. `February 2026`, `Q1 2026`)
    pub label: String,
    pub value: f64,
    /// First calendar day of the period
    pub start: NaiveDate,
    /// Last calendar day of the period
    pub end: NaiveDate,
}

/// How the daily values inside one bucket are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPolicy {
    /// Cumulative quantities (revenue, transactions, customers)
    Sum,
    /// Ratio quantities (average ticket)
    Mean,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        AggregationPolicy::Sum
    }
}

/// Granularity level for trend queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    /// Most recent buckets kept for this granularity
    pub fn max_buckets(self) -> usize {
        match self {
            Granularity::Daily => 30,
            Granularity::Weekly => 20,
            Granularity::Monthly => 12,
            Granularity::Quarterly => 8,
            Granularity::Yearly => 3,
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Daily
    }
}

impl From<&str> for Granularity {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "weekly" => Granularity::Weekly,
            "monthly" => Granularity::Monthly,
            "quarterly" => Granularity::Quarterly,
            "yearly" => Granularity::Yearly,
            _ => Granularity::Daily,
        }
    }
}

/// Aggregate a daily series into buckets of the given granularity.
///
/// When a range is given (either bound may be open) the series is filtered
/// to it first. Daily output is only truncated when no range is given; the
/// other granularities always keep their most recent buckets.
pub fn aggregate(
    series: &DateSeries,
    granularity: Granularity,
    policy: AggregationPolicy,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Vec<Bucket> {
    let has_range = start_date.is_some() || end_date.is_some();
    let filtered = daily::filter_by_date_range(series, start_date, end_date);
    let buckets = bucketize(&filtered, granularity, policy);

    if granularity == Granularity::Daily && has_range {
        buckets
    } else {
        keep_most_recent(buckets, granularity.max_buckets())
    }
}

/// Bucket a whole series, without range filtering or truncation
pub fn bucketize(series: &DateSeries, granularity: Granularity, policy: AggregationPolicy) -> Vec<Bucket> {
    match granularity {
        Granularity::Daily => daily::aggregate_to_daily(series),
        Granularity::Weekly => weekly::aggregate_to_weekly(series),
        Granularity::Monthly => monthly::aggregate_to_monthly(series, policy),
        Granularity::Quarterly => quarterly::aggregate_to_quarterly(series, policy),
        Granularity::Yearly => yearly::aggregate_to_yearly(series, policy),
    }
}

/// Drop all but the last `limit` buckets
pub fn keep_most_recent(mut buckets: Vec<Bucket>, limit: usize) -> Vec<Bucket> {
    if buckets.len() > limit {
        buckets.drain(..buckets.len() - limit);
    }
    buckets
}

/// Running sum and count of the days in one bucket
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    days: usize,
}

impl Accumulator {
    fn value(&self, policy: AggregationPolicy) -> f64 {
        match policy {
            AggregationPolicy::Sum => self.sum,
            AggregationPolicy::Mean if self.days > 0 => self.sum / self.days as f64,
            AggregationPolicy::Mean => 0.0,
        }
    }
}

/// Group a series by period start and combine each group.
///
/// Output is keyed by the period's first day, so it is chronological.
pub(crate) fn group_by_period<F>(
    series: &DateSeries,
    policy: AggregationPolicy,
    period_start: F,
) -> Vec<(NaiveDate, f64)>
where
    F: Fn(NaiveDate) -> NaiveDate,
{
    let mut groups: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();

    for (date, value) in series {
        let acc = groups.entry(period_start(*date)).or_default();
        acc.sum += value;
        acc.days += 1;
    }

    groups
        .into_iter()
        .map(|(start, acc)| (start, acc.value(policy)))
        .collect()
}
