//! Merchant Insights
//!
//! Data pipeline behind a merchant analytics dashboard.
//! It handles:
//! - Normalizing raw API records into merchant/competition values by shape
//! - Enforcing merchant-only business rules
//! - Year-over-year window shifting and percent change
//! - Daily, weekly, monthly, quarterly and yearly trend aggregation
//! - Deduplicated, cached fetching of the current and prior-year windows

pub mod comparison;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod normalize;
pub mod trends;

pub use comparison::{bucket_changes, change, BucketChange, ChangeResult, LeapDayPolicy};
pub use config::PipelineConfig;
pub use coordinator::{HttpMetricsSource, MetricsSource, RequestCoordinator};
pub use error::{ConfigError, FetchError};
pub use models::{ComparisonSet, DashboardFilters, FetchIntent, MetricValue, NormalizedMetric};
pub use normalize::normalize_response;
pub use trends::{aggregate, Bucket, Granularity};

/// Install a `tracing` fmt subscriber at the given level.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_logging(level: tracing::Level) {
    if tracing_subscriber::fmt().with_max_level(level).try_init().is_ok() {
        tracing::info!("Logging initialized at {}", level);
    }
}

/// Install logging from a pipeline config
pub fn init_logging_from(config: &PipelineConfig) -> Result<(), ConfigError> {
    init_logging(config.level()?);
    Ok(())
}
