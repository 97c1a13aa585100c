//! Concurrent fan-out of a search to every registered provider

use super::models::{Route, SearchRequest, SearchResponse};
use crate::error::{AdapterError, SearchError};
use crate::metrics::Metrics;
use crate::providers::{ProviderAdapter, ProviderRegistry};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Fans a query out to all providers and merges their routes
///
/// A failing provider contributes zero routes; only a fault inside the
/// aggregation itself or cancellation is reported to the caller.
pub struct Aggregator {
    registry: Arc<ProviderRegistry>,
    metrics: Arc<Metrics>,
}

impl Aggregator {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self::with_metrics(registry, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(registry: Arc<ProviderRegistry>, metrics: Arc<Metrics>) -> Self {
        Self { registry, metrics }
    }

    /// Query every provider concurrently and merge the results
    ///
    /// Routes are ordered by provider registration, then by the order each
    /// provider returned them. Cancelling `cancel` aborts all in-flight
    /// provider calls. Dropping the returned future aborts them as well.
    pub async fn aggregate(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse, SearchError> {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        let request = Arc::new(request.clone());
        let mut tasks = JoinSet::new();

        for (index, provider) in self.registry.iter().enumerate() {
            let provider = Arc::clone(provider);
            let request = Arc::clone(&request);
            let cancel = cancel.clone();
            let metrics = Arc::clone(&self.metrics);

            tasks.spawn(async move {
                let routes = tokio::select! {
                    _ = cancel.cancelled() => None,
                    routes = search_provider(provider.as_ref(), &request, &metrics) => Some(routes),
                };
                (index, routes)
            });
        }

        info!(
            "Searching {} -> {} on {} providers",
            request.origin,
            request.destination,
            self.registry.len()
        );

        let mut per_provider: Vec<Option<Vec<Route>>> = vec![None; self.registry.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(routes))) => per_provider[index] = Some(routes),
                Ok((_, None)) => return Err(SearchError::Cancelled),
                Err(e) if e.is_cancelled() => return Err(SearchError::Cancelled),
                Err(e) => {
                    return Err(SearchError::Internal(format!("provider task failed: {}", e)));
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        let routes: Vec<Route> = per_provider.into_iter().flatten().flatten().collect();
        Ok(SearchResponse::from_routes(routes))
    }
}

/// Run one provider search, folding any failure into zero routes
async fn search_provider(
    provider: &dyn ProviderAdapter,
    request: &SearchRequest,
    metrics: &Metrics,
) -> Vec<Route> {
    let start = Instant::now();
    let outcome = provider.search(request).await;
    let elapsed = start.elapsed();
    metrics.record_provider(provider.name(), outcome.is_ok(), elapsed.as_millis() as u64);

    match outcome {
        Ok(routes) => {
            debug!(
                "Provider {} returned {} routes in {:?}",
                provider.name(),
                routes.len(),
                elapsed
            );
            routes
        }
        Err(e) => {
            degraded(provider.name(), &e);
            Vec::new()
        }
    }
}

fn degraded(provider: &str, error: &AdapterError) {
    match error {
        AdapterError::Timeout => warn!("Timeout for provider {}", provider),
        other => warn!("Provider {} degraded to zero routes: {}", provider, other),
    }
}
