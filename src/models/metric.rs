//! Normalized metric types
//!
//! The stable internal shape every raw API record is converted into.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::comparison::change::{change, ChangeResult};

/// Shape of a metric's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricShape {
    Scalar,
    TimeSeries,
    Categorical,
}

/// Date -> value series, ordered chronologically
pub type DateSeries = BTreeMap<NaiveDate, f64>;

/// Category -> value breakdown
pub type CategoryBreakdown = BTreeMap<String, f64>;

/// Canonical value of one metric for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Scalar(f64),
    TimeSeries(DateSeries),
    Categorical(CategoryBreakdown),
}

impl MetricValue {
    /// The value used when an entity has no record for a metric
    pub fn empty(shape: MetricShape) -> Self {
        match shape {
            MetricShape::Scalar => MetricValue::Scalar(0.0),
            MetricShape::TimeSeries => MetricValue::TimeSeries(DateSeries::new()),
            MetricShape::Categorical => MetricValue::Categorical(CategoryBreakdown::new()),
        }
    }

    pub fn shape(&self) -> MetricShape {
        match self {
            MetricValue::Scalar(_) => MetricShape::Scalar,
            MetricValue::TimeSeries(_) => MetricShape::TimeSeries,
            MetricValue::Categorical(_) => MetricShape::Categorical,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            MetricValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&DateSeries> {
        match self {
            MetricValue::TimeSeries(series) => Some(series),
            _ => None,
        }
    }

    pub fn as_categories(&self) -> Option<&CategoryBreakdown> {
        match self {
            MetricValue::Categorical(categories) => Some(categories),
            _ => None,
        }
    }
}

/// Current and prior-year values for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityValues {
    pub current: MetricValue,
    /// `None` until merged with the previous-year window, or when that
    /// window had no data for this metric
    pub previous: Option<MetricValue>,
}

impl EntityValues {
    pub fn new(current: MetricValue) -> Self {
        Self {
            current,
            previous: None,
        }
    }

    /// Year-over-year change for scalar metrics.
    ///
    /// Returns `None` for series and categorical metrics.
    pub fn scalar_change(&self) -> Option<ChangeResult> {
        let current = self.current.as_scalar()?;
        let previous = self.previous.as_ref().and_then(MetricValue::as_scalar);
        Some(change(current, previous))
    }
}

/// A metric normalized for the merchant and, optionally, the competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetric {
    pub metric_id: String,
    pub shape: MetricShape,
    pub is_percentage: bool,
    pub merchant: EntityValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor: Option<EntityValues>,
}

impl NormalizedMetric {
    pub fn merchant_change(&self) -> Option<ChangeResult> {
        self.merchant.scalar_change()
    }

    pub fn competitor_change(&self) -> Option<ChangeResult> {
        self.competitor.as_ref().and_then(EntityValues::scalar_change)
    }
}

/// Normalized metrics keyed by metric id
pub type MetricMap = BTreeMap<String, NormalizedMetric>;

/// Current window merged with the previous-year window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSet {
    pub metrics: MetricMap,
    /// Set when the previous-year window could not be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_error: Option<String>,
}

impl ComparisonSet {
    pub fn get(&self, metric_id: &str) -> Option<&NormalizedMetric> {
        self.metrics.get(metric_id)
    }

    pub fn has_previous(&self) -> bool {
        self.previous_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_metric(current: f64, previous: Option<f64>) -> NormalizedMetric {
        NormalizedMetric {
            metric_id: "total_revenue".to_string(),
            shape: MetricShape::Scalar,
            is_percentage: false,
            merchant: EntityValues {
                current: MetricValue::Scalar(current),
                previous: previous.map(MetricValue::Scalar),
            },
            competitor: None,
        }
    }

    #[test]
    fn test_empty_value_matches_shape() {
        assert_eq!(MetricValue::empty(MetricShape::Scalar), MetricValue::Scalar(0.0));
        assert_eq!(MetricValue::empty(MetricShape::TimeSeries).shape(), MetricShape::TimeSeries);
        assert_eq!(MetricValue::empty(MetricShape::Categorical).shape(), MetricShape::Categorical);
    }

    #[test]
    fn test_merchant_change() {
        let metric = scalar_metric(150.0, Some(100.0));
        let result = metric.merchant_change().unwrap();
        assert!((result.percent_change.unwrap() - 50.0).abs() < 0.001);
        assert!(metric.competitor_change().is_none());
    }

    #[test]
    fn test_change_without_previous() {
        let metric = scalar_metric(150.0, None);
        let result = metric.merchant_change().unwrap();
        assert_eq!(result.previous, None);
        assert_eq!(result.percent_change, None);
    }

    #[test]
    fn test_series_has_no_scalar_change() {
        let values = EntityValues::new(MetricValue::empty(MetricShape::TimeSeries));
        assert!(values.scalar_change().is_none());
    }

    #[test]
    fn test_absent_competitor_is_not_serialized() {
        let metric = scalar_metric(1.0, None);
        let json = serde_json::to_string(&metric).unwrap();
        assert!(!json.contains("competitor"));
        assert!(json.contains("\"shape\":\"scalar\""));
    }

    #[test]
    fn test_series_serialization_uses_iso_dates() {
        let mut series = DateSeries::new();
        series.insert(NaiveDate::from_ymd_opt(2026, 2, 5).unwrap(), 12.5);
        let json = serde_json::to_string(&MetricValue::TimeSeries(series)).unwrap();
        assert_eq!(json, r#"{"shape":"time_series","value":{"2026-02-05":12.5}}"#);
    }
}
