//! Business rule filter
//!
//! Certain figures must never be shown next to a competitor comparison,
//! whatever the API returned.

use crate::models::{MetricMap, NormalizedMetric};

use super::classifier::KnownMetric;

pub fn is_merchant_only(metric_id: &str) -> bool {
    KnownMetric::from_id(metric_id)
        .map(KnownMetric::is_merchant_only)
        .unwrap_or(false)
}

/// Remove competitor data from a merchant-only metric
pub fn enforce_merchant_only(metric: &mut NormalizedMetric) {
    if is_merchant_only(&metric.metric_id) && metric.competitor.take().is_some() {
        tracing::debug!("Removed competitor data from merchant-only metric {}", metric.metric_id);
    }
}

/// Apply every business rule to a normalized window
pub fn apply_business_rules(metrics: &mut MetricMap) {
    metrics.values_mut().for_each(enforce_merchant_only);
}
