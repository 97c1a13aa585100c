//! HTTP client for making requests to route providers

use crate::config::OutgoingSettings;
use crate::error::AdapterError;
use crate::providers::{HttpMethod, ProviderRequest, ProviderResponse};
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client wrapper shared by all provider adapters
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, AdapterError> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .user_agent(concat!("route-aggregator/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(|e| AdapterError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            default_timeout: Duration::from_secs_f64(settings.request_timeout),
        })
    }

    /// Default per-request timeout
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Execute a provider request with custom timeout
    ///
    /// A timeout surfaces as [`AdapterError::Timeout`]; the status code is
    /// not inspected here.
    pub async fn execute_with_timeout(
        &self,
        request: ProviderRequest,
        timeout: Duration,
    ) -> Result<ProviderResponse, AdapterError> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .timeout(timeout)
            .header("Accept", "application/json");

        if let Some(body) = request.body {
            req_builder = req_builder.json(&body);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    async fn parse_response(response: Response) -> Result<ProviderResponse, AdapterError> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(ProviderResponse { status, text })
    }
}
