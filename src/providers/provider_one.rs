//! ProviderOne: flat route schema

use super::timestamp;
use super::traits::*;
use crate::error::AdapterError;
use crate::search::{Route, SearchRequest};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "http://provider-one/api/v1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct OneSearchRequest<'a> {
    from: &'a str,
    to: &'a str,
    date_from: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_to: Option<NaiveDateTime>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    max_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OneSearchResponse {
    routes: Vec<OneRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OneRoute {
    from: String,
    to: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    date_from: NaiveDateTime,
    #[serde(deserialize_with = "timestamp::deserialize")]
    date_to: NaiveDateTime,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(deserialize_with = "timestamp::deserialize")]
    time_limit: NaiveDateTime,
}

impl From<OneRoute> for Route {
    fn from(r: OneRoute) -> Self {
        Route {
            id: Uuid::new_v4(),
            origin: r.from,
            destination: r.to,
            origin_date_time: r.date_from,
            destination_date_time: r.date_to,
            price: r.price,
            time_limit: r.time_limit,
        }
    }
}

/// ProviderOne schema mapping
pub struct ProviderOne {
    base_url: String,
}

impl ProviderOne {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for ProviderOne {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for ProviderOne {
    fn name(&self) -> &str {
        "provider-one"
    }

    fn search_request(&self, request: &SearchRequest) -> Result<ProviderRequest, AdapterError> {
        let body = OneSearchRequest {
            from: &request.origin,
            to: &request.destination,
            date_from: request.origin_date_time,
            date_to: request.destination_date_time(),
            max_price: request.max_price(),
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| AdapterError::InvalidRequest(e.to_string()))?;

        Ok(ProviderRequest::post(endpoint(&self.base_url, "search")).json(body))
    }

    fn parse_routes(&self, response: ProviderResponse) -> Result<Vec<Route>, AdapterError> {
        let parsed: OneSearchResponse = response.json()?;
        Ok(parsed
            .routes
            .into_iter()
            .map(Route::from)
            .filter(|route| has_valid_price(self.name(), route))
            .collect())
    }

    fn ping_request(&self) -> ProviderRequest {
        ProviderRequest::get(endpoint(&self.base_url, "ping"))
    }
}
