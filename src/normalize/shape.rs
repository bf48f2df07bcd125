//! Shape normalizers
//!
//! Convert one entity's raw record into its canonical [`MetricValue`].
//! Malformed numbers become `0`; nothing here ever fails.

use serde_json::Value;

use crate::models::{CategoryBreakdown, DateSeries, MetricShape, MetricValue, RawMetricRecord, RawSeriesPoint};
use crate::trends::daily::parse_date;

/// Parse a numeric string; empty, malformed or non-finite input is `0`
pub fn parse_number_str(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse a loosely typed numeric field
pub fn parse_number(value: &Value) -> f64 {
    match value {
        Value::String(s) => parse_number_str(s),
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Normalize a scalar value; absent values are `0`
pub fn normalize_scalar(value: Option<&Value>) -> f64 {
    value.map(parse_number).unwrap_or(0.0)
}

/// Normalize date-keyed points.
///
/// Points whose key is not a valid `YYYY-MM-DD` date are dropped.
/// Duplicate dates keep the last value.
pub fn normalize_series(points: &[RawSeriesPoint]) -> DateSeries {
    let mut series = DateSeries::new();
    for point in points {
        match parse_date(point.secondary_key.trim()) {
            Some(date) => {
                series.insert(date, parse_number(&point.primary_value));
            }
            None => {
                tracing::debug!("Dropping series point with invalid date '{}'", point.secondary_key);
            }
        }
    }
    series
}

/// Normalize category-keyed points.
///
/// Keys are kept verbatim, including empty ones. Duplicate keys keep the
/// last value.
pub fn normalize_categories(points: &[RawSeriesPoint]) -> CategoryBreakdown {
    points
        .iter()
        .map(|p| (p.secondary_key.clone(), parse_number(&p.primary_value)))
        .collect()
}

/// Normalize a record according to the metric's shape
pub fn normalize_record(record: &RawMetricRecord, shape: MetricShape) -> MetricValue {
    match shape {
        MetricShape::Scalar => MetricValue::Scalar(normalize_scalar(record.scalar_value.as_ref())),
        MetricShape::TimeSeries => MetricValue::TimeSeries(normalize_series(record.points())),
        MetricShape::Categorical => MetricValue::Categorical(normalize_categories(record.points())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn point(value: Value, key: &str) -> RawSeriesPoint {
        RawSeriesPoint {
            primary_value: value,
            secondary_key: key.to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_scalar() {
        assert_eq!(normalize_scalar(Some(&json!("1234.50"))), 1234.5);
        assert_eq!(normalize_scalar(Some(&json!(" 42 "))), 42.0);
        assert_eq!(normalize_scalar(Some(&json!("-3.25"))), -3.25);
        assert_eq!(normalize_scalar(Some(&json!(17))), 17.0);
    }

    #[test]
    fn test_normalize_scalar_malformed_is_zero() {
        assert_eq!(normalize_scalar(None), 0.0);
        assert_eq!(normalize_scalar(Some(&Value::Null)), 0.0);
        assert_eq!(normalize_scalar(Some(&json!(""))), 0.0);
        assert_eq!(normalize_scalar(Some(&json!("abc"))), 0.0);
        assert_eq!(normalize_scalar(Some(&json!("12abc"))), 0.0);
        assert_eq!(normalize_scalar(Some(&json!(true))), 0.0);
    }

    #[test]
    fn test_normalize_scalar_never_nan() {
        assert_eq!(normalize_scalar(Some(&json!("NaN"))), 0.0);
        assert_eq!(normalize_scalar(Some(&json!("inf"))), 0.0);
        assert_eq!(normalize_scalar(Some(&json!("-infinity"))), 0.0);
    }

    #[test]
    fn test_normalize_series() {
        let points = vec![
            point(json!("10.5"), "2026-02-01"),
            point(json!("bad"), "2026-02-02"),
            point(json!(7), "2026-02-03"),
        ];
        let series = normalize_series(&points);
        assert_eq!(series.len(), 3);
        assert_eq!(series[&date(2026, 2, 1)], 10.5);
        assert_eq!(series[&date(2026, 2, 2)], 0.0);
        assert_eq!(series[&date(2026, 2, 3)], 7.0);
    }

    #[test]
    fn test_normalize_series_last_write_wins() {
        let points = vec![
            point(json!("1"), "2026-02-01"),
            point(json!("2"), "2026-02-01"),
        ];
        let series = normalize_series(&points);
        assert_eq!(series.len(), 1);
        assert_eq!(series[&date(2026, 2, 1)], 2.0);
    }

    #[test]
    fn test_normalize_series_drops_invalid_dates() {
        let points = vec![
            point(json!("1"), "2026-02-30"),
            point(json!("2"), "yesterday"),
            point(json!("3"), "2026-02-28"),
        ];
        let series = normalize_series(&points);
        assert_eq!(series.len(), 1);
        assert!(series.contains_key(&date(2026, 2, 28)));
    }

    #[test]
    fn test_normalize_categories_keeps_keys_verbatim() {
        let points = vec![
            point(json!("5"), "online"),
            point(json!("3"), ""),
            point(json!("1"), "Some Unlisted Channel"),
        ];
        let categories = normalize_categories(&points);
        assert_eq!(categories.len(), 3);
        assert_eq!(categories[""], 3.0);
        assert_eq!(categories["Some Unlisted Channel"], 1.0);
    }

    #[test]
    fn test_normalize_record_by_shape() {
        let record = RawMetricRecord {
            metric_id: "revenue_per_day".to_string(),
            series: Some(vec![point(json!("4"), "2026-03-01")]),
            ..Default::default()
        };
        let value = normalize_record(&record, MetricShape::TimeSeries);
        assert_eq!(value.as_series().unwrap().len(), 1);

        // A series record classified as scalar has no scalar value
        assert_eq!(normalize_record(&record, MetricShape::Scalar), MetricValue::Scalar(0.0));
    }
}
