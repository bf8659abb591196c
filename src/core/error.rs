//! Error types for rate fetching and conversion.

use thiserror::Error;

/// Failures that can abort a single conversion request.
///
/// `TimestampParse` is the exception: it is reported by the parser but the
/// caching fetcher only logs it and hands back an uncached snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    /// API key missing locally or rejected by the upstream service.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Connection error, timeout, unreadable body or non-success HTTP status.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Body could not be parsed, or the rate table is absent or empty.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Upstream explicitly reported a non-success result.
    #[error("Upstream API error: {0}")]
    UpstreamApi(String),

    /// Requested target currency is not in the rate table.
    #[error("Currency not found: {0}")]
    CurrencyNotFound(String),

    /// Next-update timestamp could not be parsed.
    #[error("Failed to parse timestamp: {0}")]
    TimestampParse(String),
}

impl RateError {
    /// Short name of the stage that failed, used in user facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            RateError::InvalidCredential(_) => "credentials",
            RateError::Transport(_) => "network",
            RateError::MalformedResponse(_) | RateError::TimestampParse(_) => "response parsing",
            RateError::UpstreamApi(_) => "upstream api",
            RateError::CurrencyNotFound(_) => "currency validation",
        }
    }
}

impl From<reqwest::Error> for RateError {
    fn from(e: reqwest::Error) -> Self {
        RateError::Transport(e.to_string())
    }
}

/// Result type for rate operations.
pub type RateResult<T> = Result<T, RateError>;
