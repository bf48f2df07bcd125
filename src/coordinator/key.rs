//! Dedup/cache key construction

use chrono::NaiveDate;
use serde::Serialize;

use super::request::MetricsRequest;
use crate::error::FetchError;
use crate::models::FilterValue;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyFilters<'a> {
    start_date: NaiveDate,
    end_date: NaiveDate,
    provider_id: &'a str,
    merchant_id: &'a str,
    filter_values: Vec<&'a FilterValue>,
}

/// Canonical key for a request within a tab.
///
/// Built from the tab id, the sorted metric ids and the filters serialized
/// with sorted object keys and filter values sorted by id, so logically
/// identical requests always produce the same key.
pub fn request_key(tab_id: &str, request: &MetricsRequest) -> Result<String, FetchError> {
    let mut metric_ids: Vec<&str> = request.metric_ids.iter().map(String::as_str).collect();
    metric_ids.sort_unstable();
    metric_ids.dedup();

    let mut filter_values: Vec<&FilterValue> = request.filter_values.iter().collect();
    filter_values.sort_by(|a, b| {
        a.filter_id
            .cmp(&b.filter_id)
            .then_with(|| a.value.to_string().cmp(&b.value.to_string()))
    });

    let filters = KeyFilters {
        start_date: request.start_date,
        end_date: request.end_date,
        provider_id: &request.provider_id,
        merchant_id: &request.merchant_id,
        filter_values,
    };

    // Round-trip through Value: its maps are ordered by key
    let canonical = serde_json::to_value(&filters)?;

    Ok(format!(
        "{}|{}|{}",
        tab_id,
        metric_ids.join(","),
        serde_json::to_string(&canonical)?
    ))
}
