//! Gateway error types

use thiserror::Error;

/// Errors returned by the Remote Resource Gateway client.
///
/// Stage predicates treat every one of these as "stage not complete".
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure: timeout, DNS, connection reset, body read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx HTTP status
    #[error("API error: {status} - {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// 2xx response whose envelope status is not `success`
    #[error("envelope status {status:?}: {message}")]
    Envelope {
        /// Envelope `status` field
        status: String,
        /// Envelope `message` field, if any
        message: String,
    },

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Successful envelope without a `data` payload
    #[error("response for {0} carried no data")]
    MissingData(String),

    /// Base URL or path could not be turned into a URL
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl GatewayError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Http(e) => e.is_timeout() || e.is_connect(),
            GatewayError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Status { status: 401 | 403, .. })
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
