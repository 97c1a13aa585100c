//! Route aggregator: one route search over several upstream providers
//!
//! Queries every configured provider concurrently, normalizes their answers
//! into a single route model, merges them, and caches the merged response
//! for a short window.

pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod search;
pub mod web;

pub use cache::{MemoryCache, ResponseCache};
pub use config::Settings;
pub use error::{AdapterError, SearchError};
pub use providers::{ProviderAdapter, ProviderRegistry};
pub use search::{Route, SearchRequest, SearchResponse, SearchService};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
