//! Caching module for aggregated search responses
//!
//! Responses are keyed by a fingerprint of the query's origin, destination
//! and departure time. Filters do not take part in the key, so two queries
//! that differ only in filters share an entry. Every entry lives for the same
//! fixed TTL, whether or not all providers answered.

use crate::error::CacheError;
use crate::search::{SearchRequest, SearchResponse};
use async_trait::async_trait;
use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

/// Default lifetime of a cached response
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Storage for aggregated responses
///
/// A backend error is never fatal: callers treat it as a miss.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Look up a live response for the request
    async fn get(&self, request: &SearchRequest)
        -> Result<Option<Arc<SearchResponse>>, CacheError>;

    /// Store a response for the request
    async fn put(
        &self,
        request: &SearchRequest,
        response: Arc<SearchResponse>,
    ) -> Result<(), CacheError>;
}

/// Query fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a request
    ///
    /// Origin and destination are taken verbatim, exactly as the providers
    /// receive them; the departure time must match down to the nanosecond.
    pub fn for_request(request: &SearchRequest) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(request.origin.as_bytes());
        hasher.update([0u8]);
        hasher.update(request.destination.as_bytes());
        hasher.update([0u8]);
        let departure = request.origin_date_time.and_utc();
        hasher.update(departure.timestamp().to_be_bytes());
        hasher.update(departure.timestamp_subsec_nanos().to_be_bytes());

        Self(format!("{:x}", hasher.finalize()))
    }
}

/// In-process response cache
pub struct MemoryCache {
    cache: Cache<CacheKey, Arc<SearchResponse>>,
}

impl MemoryCache {
    /// Create an unbounded cache with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, None)
    }

    /// Create a cache with the given TTL and optional entry limit
    pub fn with_capacity(ttl: Duration, max_capacity: Option<u64>) -> Self {
        let mut builder = Cache::builder().time_to_live(ttl);
        if let Some(capacity) = max_capacity {
            builder = builder.max_capacity(capacity);
        }

        Self {
            cache: builder.build(),
        }
    }

}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(
        &self,
        request: &SearchRequest,
    ) -> Result<Option<Arc<SearchResponse>>, CacheError> {
        Ok(self.cache.get(&CacheKey::for_request(request)).await)
    }

    async fn put(
        &self,
        request: &SearchRequest,
        response: Arc<SearchResponse>,
    ) -> Result<(), CacheError> {
        self.cache
            .insert(CacheKey::for_request(request), response)
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchFilters;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[test]
    fn test_key_keeps_place_names_verbatim() {
        let a = SearchRequest::new("Moscow", "Sochi", at(10, 0, 0));
        let b = SearchRequest::new(" moscow", "Sochi", at(10, 0, 0));
        let c = SearchRequest::new("Moscow", "SOCHI", at(10, 0, 0));
        assert_ne!(CacheKey::for_request(&a), CacheKey::for_request(&b));
        assert_ne!(CacheKey::for_request(&a), CacheKey::for_request(&c));
    }

    #[test]
    fn test_key_ignores_filters() {
        let a = SearchRequest::new("Moscow", "Sochi", at(10, 0, 0));
        let b = a.clone().with_filters(SearchFilters {
            max_price: Some(Decimal::from(100)),
            ..Default::default()
        });
        assert_eq!(CacheKey::for_request(&a), CacheKey::for_request(&b));
    }

    #[test]
    fn test_key_uses_exact_departure_time() {
        let a = SearchRequest::new("Moscow", "Sochi", at(10, 0, 0));
        let b = SearchRequest::new("Moscow", "Sochi", at(10, 0, 1));
        assert_ne!(CacheKey::for_request(&a), CacheKey::for_request(&b));
    }

    #[test]
    fn test_key_separates_fields() {
        let a = SearchRequest::new("ab", "c", at(10, 0, 0));
        let b = SearchRequest::new("a", "bc", at(10, 0, 0));
        assert_ne!(CacheKey::for_request(&a), CacheKey::for_request(&b));
    }

    #[tokio::test]
    async fn test_result_cache() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let request = SearchRequest::new("Moscow", "Sochi", at(10, 0, 0));

        assert!(cache.get(&request).await.unwrap().is_none());

        let response = Arc::new(SearchResponse::empty());
        cache.put(&request, response.clone()).await.unwrap();

        let cached = cache.get(&request).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&cached, &response));
    }

    #[tokio::test]
    async fn test_expired_entry_is_not_served() {
        let cache = MemoryCache::new(Duration::from_millis(100));
        let request = SearchRequest::new("Moscow", "Sochi", at(10, 0, 0));

        cache
            .put(&request, Arc::new(SearchResponse::empty()))
            .await
            .unwrap();
        assert!(cache.get(&request).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(cache.get(&request).await.unwrap().is_none());
    }
}
