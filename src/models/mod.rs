//! Data models module
//!
//! Contains all data structures used throughout the pipeline:
//! - Raw API response types
//! - Normalized metric types
//! - Dashboard filter types

pub mod filters;
pub mod metric;
pub mod raw;

pub use filters::{DashboardFilters, FetchIntent, FilterValue};
pub use metric::{
    CategoryBreakdown, ComparisonSet, DateSeries, EntityValues, MetricMap, MetricShape,
    MetricValue, NormalizedMetric,
};
pub use raw::{ApiResponse, RawMetricRecord, RawSeriesPoint};
