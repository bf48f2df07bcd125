//! Entity splitting
//!
//! Partitions the records of one metric into merchant and competitor.

use crate::models::RawMetricRecord;

/// Records of one metric, by entity
#[derive(Debug, Clone, Copy, Default)]
pub struct EntitySplit<'a> {
    pub merchant: Option<&'a RawMetricRecord>,
    pub competitor: Option<&'a RawMetricRecord>,
}

/// Pick the merchant and competitor records for `metric_id`.
///
/// The API should send at most one record per entity; when it sends more,
/// the last one wins.
pub fn split<'a>(records: &'a [RawMetricRecord], metric_id: &str) -> EntitySplit<'a> {
    let mut result = EntitySplit::default();

    for record in records.iter().filter(|r| r.metric_id == metric_id) {
        let slot = if record.is_competitor() {
            &mut result.competitor
        } else {
            &mut result.merchant
        };
        if slot.is_some() {
            tracing::debug!(
                "Duplicate '{}' record for {}, keeping the last one",
                record.entity_tag,
                metric_id
            );
        }
        *slot = Some(record);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn record(metric_id: &str, entity_tag: &str, value: &str) -> RawMetricRecord {
        RawMetricRecord {
            metric_id: metric_id.to_string(),
            scalar_value: Some(Value::String(value.to_string())),
            entity_tag: entity_tag.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_split_merchant_and_competitor() {
        let records = vec![
            record("total_revenue", "merchant", "1"),
            record("total_revenue", "competition", "2"),
            record("avg_ticket", "merchant", "3"),
        ];

        let split = split(&records, "total_revenue");
        assert_eq!(split.merchant.unwrap().scalar_value, Some(Value::String("1".into())));
        assert_eq!(split.competitor.unwrap().scalar_value, Some(Value::String("2".into())));
    }

    #[test]
    fn test_split_without_competitor() {
        let records = vec![record("avg_ticket", "m-123", "3")];
        let split = split(&records, "avg_ticket");
        assert!(split.merchant.is_some());
        assert!(split.competitor.is_none());
    }

    #[test]
    fn test_split_last_record_wins() {
        let records = vec![
            record("total_revenue", "merchant", "1"),
            record("total_revenue", "another-merchant-tag", "5"),
        ];
        let split = split(&records, "total_revenue");
        assert_eq!(split.merchant.unwrap().scalar_value, Some(Value::String("5".into())));
    }

    #[test]
    fn test_split_missing_metric() {
        let records = vec![record("total_revenue", "merchant", "1")];
        let split = split(&records, "avg_ticket");
        assert!(split.merchant.is_none());
        assert!(split.competitor.is_none());
    }
}
