//! Provider loader for building the registry from configuration

use super::provider_one::ProviderOne;
use super::provider_two::ProviderTwo;
use super::registry::ProviderRegistry;
use super::traits::{HttpProvider, Provider, ProviderAdapter};
use crate::config::{ProviderConfig, Settings};
use crate::network::HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Build the registry: ProviderOne first, then ProviderTwo, skipping disabled ones
    pub fn load(settings: &Settings, client: &HttpClient) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        let providers = &settings.providers;

        Self::register(
            &mut registry,
            ProviderOne::with_base_url(&providers.provider_one.base_url),
            &providers.provider_one,
            client,
        );
        Self::register(
            &mut registry,
            ProviderTwo::with_base_url(&providers.provider_two.base_url),
            &providers.provider_two,
            client,
        );

        info!("Loaded {} providers", registry.len());
        registry
    }

    fn register<P: Provider + 'static>(
        registry: &mut ProviderRegistry,
        provider: P,
        config: &ProviderConfig,
        client: &HttpClient,
    ) {
        if config.disabled {
            info!("Skipping disabled provider: {}", provider.name());
            return;
        }

        info!("Loaded provider: {} ({})", provider.name(), config.base_url);
        let mut adapter = HttpProvider::new(provider, client.clone());
        if let Some(timeout) = config.timeout {
            adapter = adapter.with_timeout(Duration::from_secs_f64(timeout));
        }
        registry.register(Arc::new(adapter) as Arc<dyn ProviderAdapter>);
    }
}
