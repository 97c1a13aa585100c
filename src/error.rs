//! Error types for the route aggregator.
//!
//! Provider and cache failures are recovered inside the core; only
//! [`SearchError`] ever reaches a caller of the search facade.

/// Failure of a single provider call.
///
/// Never surfaces to callers: the aggregator folds every variant into
/// "zero routes from this provider".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// Connection, DNS or body read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider did not answer within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The provider answered with a non-success status code.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The body could not be parsed into the provider's schema.
    #[error("parse error: {0}")]
    Parse(String),

    /// The outbound request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else {
            AdapterError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Parse(err.to_string())
    }
}

/// Failure of the aggregation core itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// An invariant inside the aggregator was violated (e.g. a provider task panicked).
    #[error("internal aggregation failure: {0}")]
    Internal(String),

    /// The caller cancelled the search before it completed.
    #[error("search cancelled")]
    Cancelled,
}

/// Failure of a cache backend. Always treated as a miss.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Convenience alias for results of the search facade.
pub type Result<T> = std::result::Result<T, SearchError>;
