//! Error types for the pricing core
//!
//! Every network failure is classified here at the client boundary and
//! propagated to the caller unchanged. The enum is `Clone` so the request
//! deduplicator can hand the same failure to every waiter.

use thiserror::Error;

/// Unified error type for pricing API and cache operations
#[derive(Debug, Clone, Error)]
pub enum PriceError {
    /// Network call exceeded its deadline or was aborted by the caller
    #[error("Request timed out. Please try again.")]
    Timeout,
    /// API kept returning a rate-limit status after all retries
    #[error("Scryfall API Error: {0}")]
    RateLimitExceeded(u16),
    /// API reported degraded/unavailable status (HTTP 503)
    #[error("Scryfall is temporarily unavailable")]
    ServiceUnavailable,
    /// Scryfall returned a structured error body
    #[error("{code}: {details}")]
    ApiResponse { code: String, details: String },
    /// HTTP error status with no parseable error body
    #[error("HTTP error: {0}")]
    HttpStatus(u16),
    /// HTTP request failed (connection refused, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),
    /// Failed to parse a JSON response
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for PriceError {
    fn from(err: reqwest::Error) -> Self {
        // A reqwest deadline hit is our Timeout classification, and it takes
        // precedence over any retry handling.
        if err.is_timeout() {
            PriceError::Timeout
        } else if err.is_decode() {
            PriceError::Parse(err.to_string())
        } else {
            PriceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PriceError {
    fn from(err: serde_json::Error) -> Self {
        PriceError::Parse(err.to_string())
    }
}

/// Result alias for pricing operations
pub type Result<T> = std::result::Result<T, PriceError>;
