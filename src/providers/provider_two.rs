//! ProviderTwo: nested departure/arrival point schema

use super::timestamp;
use super::traits::*;
use crate::error::AdapterError;
use crate::search::{Route, SearchRequest};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "http://provider-two/api/v1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TwoSearchRequest<'a> {
    departure: &'a str,
    arrival: &'a str,
    departure_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_time_limit: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TwoSearchResponse {
    routes: Vec<TwoRoute>,
}

/// A named point with the moment the route passes it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TwoPoint {
    point: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    date: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TwoRoute {
    departure: TwoPoint,
    arrival: TwoPoint,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(deserialize_with = "timestamp::deserialize")]
    time_limit: NaiveDateTime,
}

impl From<TwoRoute> for Route {
    fn from(r: TwoRoute) -> Self {
        Route {
            id: Uuid::new_v4(),
            origin: r.departure.point,
            destination: r.arrival.point,
            origin_date_time: r.departure.date,
            destination_date_time: r.arrival.date,
            price: r.price,
            time_limit: r.time_limit,
        }
    }
}

/// ProviderTwo schema mapping
pub struct ProviderTwo {
    base_url: String,
}

impl ProviderTwo {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for ProviderTwo {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for ProviderTwo {
    fn name(&self) -> &str {
        "provider-two"
    }

    fn search_request(&self, request: &SearchRequest) -> Result<ProviderRequest, AdapterError> {
        let body = TwoSearchRequest {
            departure: &request.origin,
            arrival: &request.destination,
            departure_date: request.origin_date_time,
            min_time_limit: request.min_time_limit(),
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| AdapterError::InvalidRequest(e.to_string()))?;

        Ok(ProviderRequest::post(endpoint(&self.base_url, "search")).json(body))
    }

    fn parse_routes(&self, response: ProviderResponse) -> Result<Vec<Route>, AdapterError> {
        let parsed: TwoSearchResponse = response.json()?;
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
