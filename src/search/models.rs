//! Unified search request and response models

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider-agnostic route search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Start point of the route, e.g. "Moscow"
    pub origin: String,
    /// End point of the route, e.g. "Sochi"
    pub destination: String,
    /// Start date of the route
    pub origin_date_time: NaiveDateTime,
    /// Optional narrowing filters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
}

impl SearchRequest {
    /// Create a request without filters
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        origin_date_time: NaiveDateTime,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            origin_date_time,
            filters: None,
        }
    }

    /// Attach filters
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Latest acceptable arrival, if filtered
    pub fn destination_date_time(&self) -> Option<NaiveDateTime> {
        self.filters.as_ref().and_then(|f| f.destination_date_time)
    }

    /// Maximum acceptable price, if filtered
    pub fn max_price(&self) -> Option<Decimal> {
        self.filters.as_ref().and_then(|f| f.max_price)
    }

    /// Minimum acceptable offer time limit, if filtered
    pub fn min_time_limit(&self) -> Option<NaiveDateTime> {
        self.filters.as_ref().and_then(|f| f.min_time_limit)
    }

    /// Check that both endpoints are present
    pub fn is_valid(&self) -> bool {
        !self.origin.trim().is_empty() && !self.destination.trim().is_empty()
    }
}

/// Optional search filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// End date of the route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_date_time: Option<NaiveDateTime>,
    /// Maximum price of the route
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_price: Option<Decimal>,
    /// Minimum value of the offer time limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_time_limit: Option<NaiveDateTime>,
}

/// A single route offer, normalized from any provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Identifier of the whole route, fresh on every normalization
    pub id: Uuid,
    pub origin: String,
    pub destination: String,
    pub origin_date_time: NaiveDateTime,
    pub destination_date_time: NaiveDateTime,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// After this moment the offer is no longer valid
    pub time_limit: NaiveDateTime,
}

impl Route {
    /// Travel time in whole minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.destination_date_time - self.origin_date_time).num_minutes()
    }
}

/// Aggregated search response
///
/// Statistics are `None` exactly when `routes` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub routes: Vec<Route>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_price: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration_minutes: Option<i64>,
}

impl SearchResponse {
    /// Build a response and compute its statistics over `routes`
    pub fn from_routes(routes: Vec<Route>) -> Self {
        let min_price = routes.iter().map(|r| r.price).min();
        let max_price = routes.iter().map(|r| r.price).max();
        let min_duration_minutes = routes.iter().map(Route::duration_minutes).min();
        let max_duration_minutes = routes.iter().map(Route::duration_minutes).max();

        Self {
            routes,
            min_price,
            max_price,
            min_duration_minutes,
            max_duration_minutes,
        }
    }

    /// Response with no routes and no statistics
    pub fn empty() -> Self {
        Self::from_routes(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
