//! Search orchestration module
//!
//! Coordinates route search across all providers, merges their results,
//! and answers availability checks.

mod aggregator;
mod availability;
mod models;
mod service;

pub use aggregator::Aggregator;
pub use availability::AvailabilityChecker;
pub use models::*;
pub use service::SearchService;
