//! Search facade: cache first, aggregate on miss

use super::aggregator::Aggregator;
use super::availability::AvailabilityChecker;
use super::models::{SearchRequest, SearchResponse};
use crate::cache::ResponseCache;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::providers::ProviderRegistry;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Single entry point for route search and liveness
pub struct SearchService {
    aggregator: Aggregator,
    availability: AvailabilityChecker,
    cache: Arc<dyn ResponseCache>,
    metrics: Arc<Metrics>,
    registry: Arc<ProviderRegistry>,
}

impl SearchService {
    /// Create a search service over a provider registry and a cache
    pub fn new(registry: Arc<ProviderRegistry>, cache: Arc<dyn ResponseCache>) -> Self {
        Self::with_metrics(registry, cache, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(
        registry: Arc<ProviderRegistry>,
        cache: Arc<dyn ResponseCache>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            aggregator: Aggregator::with_metrics(Arc::clone(&registry), Arc::clone(&metrics)),
            availability: AvailabilityChecker::new(Arc::clone(&registry)),
            cache,
            metrics,
            registry,
        }
    }

    /// Search routes, serving from cache while the entry is live
    ///
    /// Provider failures never surface here; a cache backend error is treated
    /// as a miss. Concurrent misses for the same key each query the providers.
    pub async fn search(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<Arc<SearchResponse>> {
        self.metrics.inc_search();

        match self.cache.get(request).await {
            Ok(Some(cached)) => {
                debug!(
                    "Cache hit for {} -> {} ({} routes)",
                    request.origin,
                    request.destination,
                    cached.len()
                );
                self.metrics.record_cache_hit();
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache lookup failed, treating as miss: {}", e),
        }
        self.metrics.record_cache_miss();

        let response = Arc::new(self.aggregator.aggregate(request, cancel).await?);

        if let Err(e) = self.cache.put(request, Arc::clone(&response)).await {
            warn!("Failed to cache search response: {}", e);
        }

        Ok(response)
    }

    /// True only if every provider answers its ping
    pub async fn is_available(&self, cancel: &CancellationToken) -> bool {
        self.availability.is_available(cancel).await
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Number of registered providers
    pub fn provider_count(&self) -> usize {
        self.registry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::error::{AdapterError, CacheError, SearchError};
    use crate::providers::ProviderAdapter;
    use crate::search::Route;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use uuid::Uuid;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    struct Counting {
        prices: Vec<i64>,
        calls: AtomicUsize,
    }

    impl Counting {
        fn new(prices: Vec<i64>) -> Arc<Self> {
            Arc::new(Self {
                prices,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderAdapter for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn search(&self, request: &SearchRequest) -> std::result::Result<Vec<Route>, AdapterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .prices
                .iter()
                .map(|p| Route {
                    id: Uuid::new_v4(),
                    origin: request.origin.clone(),
                    destination: request.destination.clone(),
                    origin_date_time: request.origin_date_time,
                    destination_date_time: request.origin_date_time + chrono::Duration::hours(2),
                    price: Decimal::from(*p),
                    time_limit: at(6),
                })
                .collect())
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    /// Answers only queries whose origin is exactly "Moscow"
    struct ExactOrigin;

    #[async_trait]
    impl ProviderAdapter for ExactOrigin {
        fn name(&self) -> &str {
            "exact-origin"
        }

        async fn search(&self, request: &SearchRequest) -> std::result::Result<Vec<Route>, AdapterError> {
            if request.origin != "Moscow" {
                return Ok(Vec::new());
            }
            Ok(vec![Route {
                id: Uuid::new_v4(),
                origin: request.origin.clone(),
                destination: request.destination.clone(),
                origin_date_time: request.origin_date_time,
                destination_date_time: request.origin_date_time + chrono::Duration::hours(2),
                price: Decimal::from(100),
                time_limit: at(6),
            }])
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    struct BrokenCache;

    #[async_trait]
    impl ResponseCache for BrokenCache {
        async fn get(
            &self,
            _request: &SearchRequest,
        ) -> std::result::Result<Option<Arc<SearchResponse>>, CacheError> {
            Err(CacheError::Backend("connection reset".into()))
        }

        async fn put(
            &self,
            _request: &SearchRequest,
            _response: Arc<SearchResponse>,
        ) -> std::result::Result<(), CacheError> {
            Err(CacheError::Backend("connection reset".into()))
        }
    }

    fn service(
        providers: &[Arc<Counting>],
        cache: Arc<dyn ResponseCache>,
    ) -> SearchService {
        let mut registry = ProviderRegistry::new();
        for p in providers {
            registry.register(p.clone());
        }
        SearchService::new(Arc::new(registry), cache)
    }

    #[tokio::test]
    async fn test_second_search_is_served_from_cache() {
        let one = Counting::new(vec![100, 200]);
        let two = Counting::new(vec![150]);
        let service = service(
            &[one.clone(), two.clone()],
            Arc::new(MemoryCache::new(Duration::from_secs(300))),
        );
        let request = SearchRequest::new("Moscow", "Sochi", at(10));
        let cancel = CancellationToken::new();

        let first = service.search(&request, &cancel).await.unwrap();
        let second = service.search(&request, &cancel).await.unwrap();

        assert_eq!(first.len(), 3);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(one.calls() + two.calls(), 2);
        assert_eq!(one.calls(), 1);

        let snapshot = service.metrics().snapshot();
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 1);
    }

    #[tokio::test]
    async fn test_differently_spelled_places_are_cached_apart() {
        let registry = ProviderRegistry::new().with(Arc::new(ExactOrigin));
        let service = SearchService::new(
            Arc::new(registry),
            Arc::new(MemoryCache::new(Duration::from_secs(300))),
        );
        let cancel = CancellationToken::new();

        let loose = service
            .search(&SearchRequest::new(" moscow", "Sochi", at(10)), &cancel)
            .await
            .unwrap();
        let exact = service
            .search(&SearchRequest::new("Moscow", "Sochi", at(10)), &cancel)
            .await
            .unwrap();

        assert!(loose.is_empty());
        assert_eq!(exact.len(), 1);
        assert_eq!(service.metrics().snapshot().cache_hits, 0);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_new_search() {
        let one = Counting::new(vec![100]);
        let service = service(
            &[one.clone()],
            Arc::new(MemoryCache::new(Duration::from_millis(100))),
        );
        let request = SearchRequest::new("Moscow", "Sochi", at(10));
        let cancel = CancellationToken::new();

        service.search(&request, &cancel).await.unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;
        service.search(&request, &cancel).await.unwrap();

        assert_eq!(one.calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_backend_failure_is_a_miss() {
        let one = Counting::new(vec![100]);
        let service = service(&[one.clone()], Arc::new(BrokenCache));
        let request = SearchRequest::new("Moscow", "Sochi", at(10));
        let cancel = CancellationToken::new();

        let response = service.search(&request, &cancel).await.unwrap();
        service.search(&request, &cancel).await.unwrap();

        assert_eq!(response.len(), 1);
        assert_eq!(one.calls(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_search_is_not_cached() {
        let one = Counting::new(vec![100]);
        let cache = Arc::new(MemoryCache::default());
        let service = service(&[one.clone()], cache.clone());
        let request = SearchRequest::new("Moscow", "Sochi", at(10));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = service.search(&request, &cancel).await;

        assert_eq!(result.unwrap_err(), SearchError::Cancelled);
        assert!(cache.get(&request).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_is_available() {
        let service = service(
            &[Counting::new(vec![]), Counting::new(vec![])],
            Arc::new(MemoryCache::default()),
        );
        assert!(service.is_available(&CancellationToken::new()).await);
    }
}
