//! Provider traits and types

use crate::error::AdapterError;
use crate::network::HttpClient;
use crate::search::{Route, SearchRequest};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP request to be made to a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// JSON body
    pub body: Option<serde_json::Value>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            body: None,
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            body: None,
        }
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.body = Some(data);
        self
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl ProviderResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, AdapterError> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Schema mapping for one upstream provider
///
/// Implementations are pure: they build requests and parse responses,
/// the HTTP round trip is done by [`HttpProvider`].
pub trait Provider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Build the search request for a unified query
    fn search_request(&self, request: &SearchRequest) -> Result<ProviderRequest, AdapterError>;

    /// Parse a successful search response into unified routes
    fn parse_routes(&self, response: ProviderResponse) -> Result<Vec<Route>, AdapterError>;

    /// Build the liveness ping request
    fn ping_request(&self) -> ProviderRequest;
}

/// Capability interface the aggregator fans out to
///
/// `search` reports failures explicitly; the aggregator decides to treat
/// them as zero routes. `ping` never fails, it answers `false` instead.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider name, used for logging and metrics
    fn name(&self) -> &str;

    /// Search routes for a unified query
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Route>, AdapterError>;

    /// Check whether the provider is reachable
    async fn ping(&self) -> bool;
}

/// A [`Provider`] bound to an HTTP client
pub struct HttpProvider<P> {
    provider: P,
    client: HttpClient,
    timeout: Duration,
}

impl<P: Provider> HttpProvider<P> {
    pub fn new(provider: P, client: HttpClient) -> Self {
        let timeout = client.default_timeout();
        Self {
            provider,
            client,
            timeout,
        }
    }

    /// Override the client's default timeout for this provider
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl<P: Provider> ProviderAdapter for HttpProvider<P> {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<Route>, AdapterError> {
        let outbound = self.provider.search_request(request)?;
        let response = self
            .client
            .execute_with_timeout(outbound, self.timeout)
            .await?;

        if !response.is_success() {
            return Err(AdapterError::Status(response.status));
        }

        let routes = self.provider.parse_routes(response)?;
        debug!("{} mapped {} routes", self.name(), routes.len());
        Ok(routes)
    }

    async fn ping(&self) -> bool {
        match self
            .client
            .execute_with_timeout(self.provider.ping_request(), self.timeout)
            .await
        {
            Ok(response) => response.is_success(),
            Err(e) => {
                debug!("Ping failed for {}: {}", self.name(), e);
                false
            }
        }
    }
}

/// Keep a mapped route only if its price is non-negative
pub(crate) fn has_valid_price(provider: &str, route: &Route) -> bool {
    if route.price.is_sign_negative() && !route.price.is_zero() {
        warn!(
            "{} sent a negative price {} for {} -> {}, skipping row",
            provider, route.price, route.origin, route.destination
        );
        return false;
    }
    true
}

/// Join a base URL and an endpoint path with exactly one slash
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
