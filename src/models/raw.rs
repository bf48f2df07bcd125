//! Raw API response types
//!
//! Mirrors the loosely typed payload returned by the analytics API.
//! Numeric fields arrive as strings most of the time but are occasionally
//! plain JSON numbers, so they are kept as [`Value`] until normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entity tag that marks the aggregate competition baseline
pub const COMPETITION_TAG: &str = "competition";

/// One point of a date- or category-keyed series
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeriesPoint {
    #[serde(default)]
    pub primary_value: Value,
    #[serde(default)]
    pub secondary_key: String,
}

/// One metric for one entity, exactly as received
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetricRecord {
    pub metric_id: String,
    #[serde(default)]
    pub is_percentage: bool,
    #[serde(default)]
    pub scalar_value: Option<Value>,
    #[serde(default)]
    pub series: Option<Vec<RawSeriesPoint>>,
    #[serde(default)]
    pub entity_tag: String,
}

impl RawMetricRecord {
    /// Whether this record belongs to the competition baseline.
    ///
    /// The comparison is case-sensitive; every other tag is the merchant.
    pub fn is_competitor(&self) -> bool {
        self.entity_tag == COMPETITION_TAG
    }

    /// Series points, treating a missing series as empty
    pub fn points(&self) -> &[RawSeriesPoint] {
        self.series.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPayload {
    #[serde(default)]
    pub metrics: Option<Vec<RawMetricRecord>>,
}

/// Envelope returned by the analytics API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default)]
    pub payload: Option<RawPayload>,
    #[serde(default)]
    pub exception: Option<Value>,
    #[serde(default)]
    pub messages: Option<Value>,
    #[serde(default)]
    pub execution_time: Option<Value>,
}

impl ApiResponse {
    /// Parse a response body
    pub fn from_json_str(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// All metric records; an absent payload means zero metrics
    pub fn records(&self) -> &[RawMetricRecord] {
        self.payload
            .as_ref()
            .and_then(|p| p.metrics.as_deref())
            .unwrap_or(&[])
    }

    pub fn from_records(records: Vec<RawMetricRecord>) -> Self {
        Self {
            payload: Some(RawPayload {
                metrics: Some(records),
            }),
            ..Default::default()
        }
    }
}
