//! Settings structures for the route aggregator

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub providers: ProvidersSettings,
    pub cache: CacheSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (ROUTES_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("ROUTES_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("ROUTES_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("ROUTES_PROVIDER_ONE_URL") {
            self.providers.provider_one.base_url = val;
        }
        if let Ok(val) = std::env::var("ROUTES_PROVIDER_TWO_URL") {
            self.providers.provider_two.base_url = val;
        }
        if let Ok(val) = std::env::var("ROUTES_CACHE_TTL_SECONDS") {
            if let Ok(ttl) = val.parse() {
                self.cache.ttl_seconds = ttl;
            }
        }
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        for (name, provider) in self.providers.iter() {
            if provider.disabled {
                continue;
            }
            url::Url::parse(&provider.base_url)
                .map_err(|e| anyhow::anyhow!("Invalid base_url for {}: {}", name, e))?;
            if matches!(provider.timeout, Some(t) if !t.is_finite() || t <= 0.0) {
                anyhow::bail!("Timeout for {} must be a positive finite number", name);
            }
        }
        if self.cache.ttl_seconds == 0 {
            anyhow::bail!("cache.ttl_seconds must be greater than zero");
        }
        if !self.outgoing.request_timeout.is_finite() || self.outgoing.request_timeout <= 0.0 {
            anyhow::bail!("outgoing.request_timeout must be a positive finite number");
        }
        Ok(())
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            pool_maxsize: 20,
        }
    }
}

/// The fixed provider set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersSettings {
    pub provider_one: ProviderConfig,
    pub provider_two: ProviderConfig,
}

impl ProvidersSettings {
    /// Providers with their names, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ProviderConfig)> {
        [
            ("provider_one", &self.provider_one),
            ("provider_two", &self.provider_two),
        ]
        .into_iter()
    }
}

impl Default for ProvidersSettings {
    fn default() -> Self {
        Self {
            provider_one: ProviderConfig::new(crate::providers::provider_one::DEFAULT_BASE_URL),
            provider_two: ProviderConfig::new(crate::providers::provider_two::DEFAULT_BASE_URL),
        }
    }
}

/// Individual provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL; `/search` and `/ping` are appended
    pub base_url: String,
    /// Whether the provider is disabled
    pub disabled: bool,
    /// Custom timeout for this provider in seconds
    pub timeout: Option<f64>,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Lifetime of a cached response in seconds
    pub ttl_seconds: u64,
    /// Maximum number of cached responses (none = unbounded)
    pub max_capacity: Option<u64>,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            max_capacity: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.cache.ttl(), Duration::from_secs(300));
        assert_eq!(settings.cache.max_capacity, None);
        assert_eq!(
            settings.providers.provider_one.base_url,
            "http://provider-one/api/v1"
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::from_yaml(
            r#"
providers:
  provider_two:
    base_url: "http://localhost:9002/api/v1"
    timeout: 2.5
cache:
  ttl_seconds: 60
"#,
        )
        .unwrap();

        assert_eq!(
            settings.providers.provider_one.base_url,
            "http://provider-one/api/v1"
        );
        assert_eq!(
            settings.providers.provider_two.base_url,
            "http://localhost:9002/api/v1"
        );
        assert_eq!(settings.providers.provider_two.timeout, Some(2.5));
        assert_eq!(settings.cache.ttl_seconds, 60);
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_validate_rejects_bad_url_and_zero_ttl() {
        let mut settings = Settings::default();
        settings.providers.provider_one.base_url = "not a url".to_string();
        assert!(settings.validate().is_err());

        settings.providers.provider_one.disabled = true;
        assert!(settings.validate().is_ok());

        settings.cache.ttl_seconds = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_timeouts() {
        let settings = Settings::from_yaml("outgoing:\n  request_timeout: .nan\n").unwrap();
        assert!(settings.validate().is_err());

        let mut settings = Settings::from_yaml(
            r#"
providers:
  provider_one:
    base_url: "http://localhost:9001/api/v1"
    timeout: .inf
"#,
        )
        .unwrap();
        assert!(settings.validate().is_err());
        settings.providers.provider_one.timeout = Some(1.5);
        assert!(settings.validate().is_ok());

        let mut settings = Settings::default();
        settings.outgoing.request_timeout = -1.0;
        assert!(settings.validate().is_err());
    }
}
