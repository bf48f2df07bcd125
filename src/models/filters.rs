//! Dashboard filter types
//!
//! What the filter sidebar hands to the pipeline, and what a chart asks for.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `{ filterId, value }` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterValue {
    pub filter_id: String,
    pub value: Value,
}

impl FilterValue {
    pub fn new(filter_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            filter_id: filter_id.into(),
            value: value.into(),
        }
    }
}

/// Active dashboard filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilters {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub provider_id: String,
    pub merchant_id: String,
    #[serde(default)]
    pub filter_values: Vec<FilterValue>,
}

impl DashboardFilters {
    /// Apply metric-specific overrides on top of these filters.
    ///
    /// An override replaces the value of an existing filter with the same
    /// id; overrides for filters not yet present are appended.
    pub fn with_overrides(&self, overrides: &[FilterValue]) -> DashboardFilters {
        let mut merged = self.clone();
        for over in overrides {
            match merged
                .filter_values
                .iter_mut()
                .find(|f| f.filter_id == over.filter_id)
            {
                Some(existing) => existing.value = over.value.clone(),
                None => merged.filter_values.push(over.clone()),
            }
        }
        merged
    }
}

/// A chart's request for data within a dashboard tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchIntent {
    /// Cache namespace only; carries no business meaning
    pub tab_id: String,
    pub metric_ids: Vec<String>,
    #[serde(default)]
    pub overrides: Vec<FilterValue>,
}

impl FetchIntent {
    pub fn new<I, S>(tab_id: impl Into<String>, metric_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tab_id: tab_id.into(),
            metric_ids: metric_ids.into_iter().map(Into::into).collect(),
            overrides: Vec::new(),
        }
    }

    pub fn with_override(mut self, filter_id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.push(FilterValue::new(filter_id, value));
        self
    }
}
