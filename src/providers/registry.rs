//! Ordered registry of provider adapters

use super::traits::ProviderAdapter;
use std::sync::Arc;

/// Providers in registration order
///
/// Registration order is the order routes appear in an aggregated response.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider after all previously registered ones
    pub fn register(&mut self, provider: Arc<dyn ProviderAdapter>) {
        self.providers.push(provider);
    }

    /// Builder-style registration
    pub fn with(mut self, provider: Arc<dyn ProviderAdapter>) -> Self {
        self.register(provider);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ProviderAdapter>> {
        self.providers.iter()
    }

    /// Provider names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
