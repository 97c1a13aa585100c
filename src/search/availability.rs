//! Liveness of the provider set

use crate::providers::ProviderRegistry;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Reports whether every registered provider answers its ping
pub struct AvailabilityChecker {
    registry: Arc<ProviderRegistry>,
}

impl AvailabilityChecker {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Ping all providers concurrently
    ///
    /// Returns `false` as soon as one ping fails, panics or the token is
    /// cancelled; outstanding pings are aborted.
    pub async fn is_available(&self, cancel: &CancellationToken) -> bool {
        let mut pings = JoinSet::new();

        for provider in self.registry.iter() {
            let provider = Arc::clone(provider);
            pings.spawn(async move {
                let alive = provider.ping().await;
                (provider, alive)
            });
        }

        loop {
            let joined = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Availability check cancelled");
                    return false;
                }
                joined = pings.join_next() => joined,
            };

            match joined {
                None => return true,
                Some(Ok((_, true))) => {}
                Some(Ok((provider, false))) => {
                    warn!("Provider {} is unavailable", provider.name());
                    return false;
                }
                Some(Err(e)) => {
                    warn!("Availability ping failed: {}", e);
                    return false;
                }
            }
        }
    }
}
