//! Request coordination module
//!
//! Serves dashboard fetches while:
//! - Collapsing concurrent identical fetches into one pair of API calls
//! - Serving short-lived cached results until the filters change
//! - Fetching the current and prior-year windows concurrently
//!
//! # Example
//!
//! ```no_run
//! use merchant_insights::coordinator::{HttpMetricsSource, RequestCoordinator};
//! use merchant_insights::models::{DashboardFilters, FetchIntent};
//!
//! # async fn run(filters: DashboardFilters) -> Result<(), merchant_insights::FetchError> {
//! let coordinator = RequestCoordinator::builder()
//!     .build(HttpMetricsSource::new("https://analytics.example.com/api/metrics"));
//!
//! let intent = FetchIntent::new("revenue", ["total_revenue", "revenue_per_day"]);
//! let data = coordinator.fetch(&intent, &filters).await?;
//! if let Some(revenue) = data.get("total_revenue") {
//!     println!("{:?}", revenue.merchant_change());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod key;
pub mod request;
pub mod source;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::comparison::{merge_windows, LeapDayPolicy};
use crate::config::PipelineConfig;
use crate::error::FetchError;
use crate::models::{ComparisonSet, DashboardFilters, FetchIntent};
use crate::normalize::normalize_response;

pub use cache::{Clock, ManualClock, ResponseCache, SystemClock};
pub use key::request_key;
pub use request::MetricsRequest;
pub use source::{HttpMetricsSource, MetricsSource};

/// Outcome of one fetch, shared by every caller that joined it
pub type FetchResult = Result<Arc<ComparisonSet>, FetchError>;

type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;
type InFlightMap = Arc<Mutex<HashMap<String, SharedFetch>>>;

/// Removes a key from the in-flight map when dropped, whether the fetch
/// succeeded, failed or panicked
struct InFlightGuard {
    key: String,
    in_flight: InFlightMap,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&self.key);
        }
    }
}

// ---------------------------------------------------------------------------
// RequestCoordinatorBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`RequestCoordinator`]
pub struct RequestCoordinatorBuilder {
    config: PipelineConfig,
    cache_ttl: Option<Duration>,
    clock: Arc<dyn Clock>,
    cache: Option<Arc<ResponseCache>>,
}

impl Default for RequestCoordinatorBuilder {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            cache_ttl: None,
            clock: Arc::new(SystemClock),
            cache: None,
        }
    }
}

impl RequestCoordinatorBuilder {
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set how long results are served from cache.
    ///
    /// Takes precedence over the config's whole-second TTL.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Inject the clock used for cache expiry.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Share an existing cache instead of creating one.
    ///
    /// Overrides the TTL and clock settings.
    pub fn cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build<S: MetricsSource>(self, source: S) -> RequestCoordinator {
        let ttl = self.cache_ttl.unwrap_or_else(|| self.config.cache_ttl());
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ResponseCache::with_clock(ttl, self.clock)));

        RequestCoordinator {
            source: Arc::new(source),
            cache,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            filters_changed: AtomicBool::new(false),
            leap_day_policy: self.config.leap_day_policy,
        }
    }
}

// ---------------------------------------------------------------------------
// RequestCoordinator
// ---------------------------------------------------------------------------

/// Deduplicating, caching front door to the analytics API
pub struct RequestCoordinator {
    source: Arc<dyn MetricsSource>,
    cache: Arc<ResponseCache>,
    in_flight: InFlightMap,
    filters_changed: AtomicBool,
    leap_day_policy: LeapDayPolicy,
}

impl RequestCoordinator {
    pub fn builder() -> RequestCoordinatorBuilder {
        RequestCoordinatorBuilder::default()
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn leap_day_policy(&self) -> LeapDayPolicy {
        self.leap_day_policy
    }

    /// Record whether the filters changed since they were last applied.
    ///
    /// While set, cached results are never served.
    pub fn set_filters_changed(&self, changed: bool) {
        self.filters_changed.store(changed, Ordering::SeqCst);
    }

    pub fn filters_changed(&self) -> bool {
        self.filters_changed.load(Ordering::SeqCst)
    }

    /// Drop all cached results
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// Number of fetches currently in flight
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Fetch, normalize and merge the current and prior-year windows.
    ///
    /// Joins an identical in-flight fetch if there is one, otherwise serves a
    /// fresh cached result unless the filters changed. Failures are returned
    /// as-is; stale cache is never used as a fallback.
    pub async fn fetch(&self, intent: &FetchIntent, filters: &DashboardFilters) -> FetchResult {
        let request = MetricsRequest::build(intent, filters)?;
        let key = request_key(&intent.tab_id, &request)?;

        let pending = {
            let mut in_flight = self.in_flight.lock().map_err(|_| FetchError::LockPoisoned)?;

            if let Some(pending) = in_flight.get(&key) {
                tracing::debug!("Joining in-flight fetch for {}", key);
                pending.clone()
            } else {
                if !self.filters_changed() {
                    if let Some(cached) = self.cache.get(&key) {
                        tracing::debug!("Cache hit for {}", key);
                        return Ok(cached);
                    }
                }

                let pending = self.spawn_fetch(key.clone(), request);
                in_flight.insert(key, pending.clone());
                pending
            }
        };

        pending.await
    }

    /// Run the fetch on its own task so it completes, and populates the
    /// cache, even if every caller stops waiting.
    fn spawn_fetch(&self, key: String, request: MetricsRequest) -> SharedFetch {
        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.cache);
        let guard = InFlightGuard {
            key: key.clone(),
            in_flight: Arc::clone(&self.in_flight),
        };

        let handle = tokio::spawn(async move {
            let _guard = guard;
            let result = fetch_windows(source.as_ref(), &request).await.map(Arc::new);
            match &result {
                Ok(data) => {
                    tracing::info!(
                        "Fetched {} metrics for {} ({})",
                        data.metrics.len(),
                        key,
                        if data.has_previous() { "with prior year" } else { "current year only" }
                    );
                    cache.insert(key, Arc::clone(data));
                }
                Err(e) => tracing::error!("Fetch failed for {}: {}", key, e),
            }
            result
        });

        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(FetchError::Aborted(e.to_string())),
            }
        }
        .boxed()
        .shared()
    }
}

/// Fetch both windows concurrently, then normalize and merge them.
///
/// A failed current window fails the whole fetch; a failed prior-year
/// window only produces a soft error.
pub async fn fetch_windows(
    source: &dyn MetricsSource,
    request: &MetricsRequest,
) -> Result<ComparisonSet, FetchError> {
    let previous_request = request.previous_year();

    let (current, previous) = match &previous_request {
        Ok(prev) => {
            let (current, previous) =
                tokio::join!(source.fetch_metrics(request), source.fetch_metrics(prev));
            (current, previous)
        }
        Err(e) => (source.fetch_metrics(request).await, Err(e.clone())),
    };

    let current = normalize_response(&current?);
    let previous = previous.map(|response| normalize_response(&response));

    Ok(merge_windows(current, previous))
}
