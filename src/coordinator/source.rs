//! Metrics transport
//!
//! The coordinator only needs something that turns a [`MetricsRequest`]
//! into an [`ApiResponse`]. Timeouts and retries belong to the
//! implementation.

use async_trait::async_trait;

use super::request::MetricsRequest;
use crate::error::FetchError;
use crate::models::ApiResponse;

#[async_trait]
pub trait MetricsSource: Send + Sync + 'static {
    async fn fetch_metrics(&self, request: &MetricsRequest) -> Result<ApiResponse, FetchError>;
}

/// Posts requests as JSON to the analytics API
pub struct HttpMetricsSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMetricsSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Use a preconfigured client (timeouts, auth headers)
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    async fn fetch_metrics(&self, request: &MetricsRequest) -> Result<ApiResponse, FetchError> {
        tracing::debug!(
            "POST {} ({} metrics, {}..{})",
            self.endpoint,
            request.metric_ids.len(),
            request.start_date,
            request.end_date
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let parsed = ApiResponse::from_json_str(&body)?;

        if let Some(exception) = parsed.exception.as_ref().filter(|e| !e.is_null()) {
            tracing::debug!("API reported exception: {}", exception);
        }
        Ok(parsed)
    }
}
