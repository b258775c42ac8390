//! Error types for the course marketplace SDK

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the external ledger client
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Read has not resolved yet; render a loading state, not a failure
    #[error("Ledger data not loaded yet")]
    NotReady,

    /// Transport-level failure reaching the ledger
    #[error("Network error: {0}")]
    Network(String),

    /// The user declined to sign the transaction
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// The contract reverted the transaction
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Timeout waiting for the ledger
    #[error("Request timeout")]
    Timeout,

    /// Local validation failed before a write was issued
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Data-integrity faults found while normalizing a raw ledger record
///
/// A record that fails normalization is excluded from the catalog; the
/// remaining records still render.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Price field is not a decimal smallest-unit integer
    #[error("Invalid price {value:?} for course {id}")]
    InvalidPrice { id: String, value: String },

    /// Student count is negative
    #[error("Negative student count {value} for course {id}")]
    NegativeCount { id: String, value: i64 },

    /// A native-asset decimal amount could not be parsed exactly
    #[error("Malformed native amount {0:?}")]
    MalformedAmount(String),
}

/// Errors that can occur when fetching the fiat rate from a feed
#[derive(Debug, Error)]
pub enum RateFeedError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Invalid response from the feed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Feed API error
    #[error("Feed API error: {0}")]
    ApiError(String),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,
}

/// Errors that can occur when retrieving the stored rate snapshot
#[derive(Debug, Error, Clone)]
pub enum RateError {
    /// No rate has been fetched yet
    #[error("Fiat rate not available")]
    NotAvailable,

    /// The stored rate is too old
    #[error("Fiat rate is stale (age: {age:?})")]
    Stale { age: Duration },
}

impl RateError {
    /// Creates a Stale error
    pub fn stale(age: Duration) -> Self {
        Self::Stale { age }
    }
}
