//! Application state shared across handlers

use crate::cache::{MemoryCache, ResponseCache};
use crate::config::Settings;
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::providers::{ProviderLoader, ProviderRegistry};
use crate::search::SearchService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Search facade
    pub search: Arc<SearchService>,
}

impl AppState {
    /// Wire providers, cache and search service from settings
    pub fn new(settings: &Settings, client: HttpClient) -> Self {
        let registry = ProviderLoader::load(settings, &client);
        let cache = MemoryCache::with_capacity(settings.cache.ttl(), settings.cache.max_capacity);
        Self::with_parts(registry, Arc::new(cache))
    }

    /// Build state from already constructed parts
    pub fn with_parts(registry: ProviderRegistry, cache: Arc<dyn ResponseCache>) -> Self {
        let search = SearchService::with_metrics(Arc::new(registry), cache, Arc::new(Metrics::new()));
        Self {
            search: Arc::new(search),
        }
    }
}
