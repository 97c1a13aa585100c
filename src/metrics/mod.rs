//! Metrics collection module
//!
//! Tracks cache effectiveness and per-provider reliability and latency.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Response times kept per provider for the rolling average
const RESPONSE_TIME_WINDOW: usize = 100;

/// In-process metrics collector
pub struct Metrics {
    /// Total search count
    total_searches: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    providers: RwLock<HashMap<String, ProviderCounters>>,
}

#[derive(Default)]
struct ProviderCounters {
    successes: u64,
    failures: u64,
    response_times: VecDeque<u64>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one provider search
    pub fn record_provider(&self, provider: &str, success: bool, time_ms: u64) {
        let mut providers = self.write();
        let counters = providers.entry(provider.to_string()).or_default();

        if success {
            counters.successes += 1;
        } else {
            counters.failures += 1;
        }

        if counters.response_times.len() >= RESPONSE_TIME_WINDOW {
            counters.response_times.pop_front();
        }
        counters.response_times.push_back(time_ms);
    }

    /// Get total searches
    pub fn total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get average response time for a provider
    pub fn avg_response_time(&self, provider: &str) -> Option<u64> {
        let providers = self.read();
        let times = &providers.get(provider)?.response_times;
        if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<u64>() / times.len() as u64)
        }
    }

    /// Get reliability percentage for a provider
    pub fn reliability(&self, provider: &str) -> f64 {
        let providers = self.read();
        providers
            .get(provider)
            .map(ProviderCounters::reliability)
            .unwrap_or(100.0)
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let providers = self.read();

        MetricsSnapshot {
            total_searches: self.total_searches(),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            providers: providers
                .iter()
                .map(|(name, c)| {
                    let avg_response_time_ms = if c.response_times.is_empty() {
                        None
                    } else {
                        Some(c.response_times.iter().sum::<u64>() / c.response_times.len() as u64)
                    };
                    (
                        name.clone(),
                        ProviderStats {
                            successes: c.successes,
                            failures: c.failures,
                            avg_response_time_ms,
                            reliability: c.reliability(),
                        },
                    )
                })
                .collect(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ProviderCounters>> {
        self.providers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ProviderCounters>> {
        self.providers.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProviderCounters {
    fn reliability(&self) -> f64 {
        let total = self.successes + self.failures;
        if total == 0 {
            100.0
        } else {
            (self.successes as f64 / total as f64) * 100.0
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of [`Metrics`]
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub providers: BTreeMap<String, ProviderStats>,
}

/// Statistics for a single provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStats {
    pub successes: u64,
    pub failures: u64,
    pub avg_response_time_ms: Option<u64>,
    pub reliability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.record_cache_miss();
        metrics.record_provider("provider-one", true, 100);
        metrics.record_provider("provider-one", false, 300);

        assert_eq!(metrics.total_searches(), 1);
        assert_eq!(metrics.avg_response_time("provider-one"), Some(200));
        assert_eq!(metrics.reliability("provider-one"), 50.0);
        assert_eq!(metrics.reliability("provider-two"), 100.0);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.providers["provider-one"].failures, 1);
    }

    #[test]
    fn test_response_time_window_is_bounded() {
        let metrics = Metrics::new();
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_provider("p", true, 10);
        }
        metrics.record_provider("p", true, 10 + RESPONSE_TIME_WINDOW as u64 * 10);
        // one 10ms sample replaced by a 1010ms sample
        assert_eq!(metrics.avg_response_time("p"), Some(20));
    }
}
