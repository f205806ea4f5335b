//! API error types.

use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the notification backend client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// An operation was attempted before an API key was configured.
    #[error("API client is not configured with an API key")]
    NotConfigured,

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response was not a usable HTTP response.
    #[error("invalid response from server")]
    InvalidResponse,

    /// A non-success status without a more specific meaning.
    #[error("HTTP error {0}")]
    HttpError(u16),

    /// A 2xx response body did not match the expected schema.
    #[error("failed to decode response: {0}")]
    DecodingError(String),

    /// The request body could not be encoded.
    #[error("failed to encode request: {0}")]
    EncodingError(String),

    /// Transport failure (DNS, connect, reset).
    #[error("network error: {0}")]
    NetworkError(String),

    /// The backend answered 429.
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// A 5xx response carrying an error envelope.
    #[error("server error: {0}")]
    ServerError(String),

    /// The backend answered 401.
    #[error("unauthorized: check the API key")]
    Unauthorized,

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,
}

impl ApiError {
    /// Returns true if the request may succeed when sent again.
    ///
    /// ## Retryable Errors
    /// - Network failures and timeouts
    /// - Server errors (5xx)
    ///
    /// Client errors, rate limiting, and local encoding/decoding problems are
    /// final.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::NetworkError(_) | ApiError::Timeout | ApiError::ServerError(_) => true,
            ApiError::HttpError(status) => *status >= 500,
            _ => false,
        }
    }

    /// The HTTP status behind this error, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError(status) => Some(*status),
            ApiError::Unauthorized => Some(401),
            ApiError::RateLimitExceeded => Some(429),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_builder() {
            ApiError::InvalidUrl(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}
