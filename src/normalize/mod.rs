//! Response normalization module
//!
//! Turns a raw API response into a [`MetricMap`]:
//! - Classify each metric id into a shape
//! - Split its records into merchant and competitor
//! - Normalize each entity's values
//! - Apply business rules

pub mod classifier;
pub mod rules;
pub mod shape;
pub mod splitter;

use crate::models::{ApiResponse, EntityValues, MetricMap, MetricValue, NormalizedMetric, RawMetricRecord};

pub use classifier::{aggregation_policy, classify, KnownMetric};
pub use rules::{apply_business_rules, is_merchant_only};
pub use splitter::{split, EntitySplit};

/// Normalize every metric of a response
pub fn normalize_response(response: &ApiResponse) -> MetricMap {
    normalize_records(response.records())
}

/// Normalize a flat list of records, one entry per distinct metric id
pub fn normalize_records(records: &[RawMetricRecord]) -> MetricMap {
    let mut metrics = MetricMap::new();

    for record in records {
        if metrics.contains_key(&record.metric_id) {
            continue;
        }
        let metric = normalize_metric(records, &record.metric_id);
        metrics.insert(record.metric_id.clone(), metric);
    }

    apply_business_rules(&mut metrics);

    tracing::debug!("Normalized {} records into {} metrics", records.len(), metrics.len());
    metrics
}

/// Normalize one metric id out of a flat list of records.
///
/// Business rules are not applied here; see [`apply_business_rules`].
pub fn normalize_metric(records: &[RawMetricRecord], metric_id: &str) -> NormalizedMetric {
    let shape = classify(metric_id);
    let EntitySplit { merchant, competitor } = split(records, metric_id);

    let merchant_value = match merchant {
        Some(record) => shape::normalize_record(record, shape),
        None => {
            tracing::debug!("No merchant record for {}, using empty value", metric_id);
            MetricValue::empty(shape)
        }
    };

    let is_percentage = merchant
        .or(competitor)
        .map(|r| r.is_percentage)
        .unwrap_or(false);

    NormalizedMetric {
        metric_id: metric_id.to_string(),
        shape,
        is_percentage,
        merchant: EntityValues::new(merchant_value),
        competitor: competitor.map(|r| EntityValues::new(shape::normalize_record(r, shape))),
    }
}
