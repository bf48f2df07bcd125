//! Request building
//!
//! Turns a fetch intent plus the active dashboard filters into the body sent
//! to the analytics API, for the current window and the prior-year window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::comparison::previous_window;
use crate::error::FetchError;
use crate::models::{DashboardFilters, FetchIntent, FilterValue};

/// Body of one analytics API call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRequest {
    pub metric_ids: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub provider_id: String,
    pub merchant_id: String,
    pub filter_values: Vec<FilterValue>,
}

impl MetricsRequest {
    /// Build the current-window request.
    ///
    /// Metric ids are sorted and deduplicated; the intent's overrides are
    /// merged into the filters.
    pub fn build(intent: &FetchIntent, filters: &DashboardFilters) -> Result<Self, FetchError> {
        if filters.start_date > filters.end_date {
            return Err(FetchError::InvalidDate(format!(
                "start {} is after end {}",
                filters.start_date, filters.end_date
            )));
        }

        let mut metric_ids = intent.metric_ids.clone();
        metric_ids.sort();
        metric_ids.dedup();

        let filters = filters.with_overrides(&intent.overrides);

        Ok(Self {
            metric_ids,
            start_date: filters.start_date,
            end_date: filters.end_date,
            provider_id: filters.provider_id,
            merchant_id: filters.merchant_id,
            filter_values: filters.filter_values,
        })
    }

    /// Same request shifted back exactly one year
    pub fn previous_year(&self) -> Result<Self, FetchError> {
        let (start_date, end_date) = previous_window(self.start_date, self.end_date)
            .ok_or_else(|| {
                FetchError::InvalidDate(format!(
                    "cannot shift {}..{} back one year",
                    self.start_date, self.end_date
                ))
            })?;

        Ok(Self {
            start_date,
            end_date,
            ..self.clone()
        })
    }
}
