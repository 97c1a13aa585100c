//! HTTP networking module
//!
//! Provides the shared HTTP client used by every provider adapter.

mod client;

pub use client::HttpClient;
