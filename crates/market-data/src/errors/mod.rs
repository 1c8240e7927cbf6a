//! Error types for the market data crate.
//!
//! Every provider adapter fails with a [`MarketDataError`]. The aggregator
//! treats all of them as "no result for this item" and moves on to the next
//! provider or to the fallback data, so none of these reach the presentation
//! layer.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    /// The provider reported quota exhaustion, either through an HTTP 429 or a
    /// rate-limit marker in an otherwise successful response body.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The response was well-formed but did not contain the expected data.
    #[error("No data from {provider}: {message}")]
    NoData {
        /// The provider that returned the empty response
        provider: String,
        /// What was missing
        message: String,
    },

    /// A quote payload lacked its price field.
    #[error("Invalid quote from {provider}: {message}")]
    InvalidQuote {
        /// The provider that returned the quote
        provider: String,
        /// Why the quote was rejected
        message: String,
    },

    /// The provider answered with a non-2xx status.
    #[error("HTTP error from {provider}: status {status}")]
    HttpError {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// Transport failure, including timeouts.
    #[error("Network error from {provider}: {message}")]
    Network {
        /// The provider that could not be reached
        provider: String,
        /// The transport error message
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to parse response from {provider}: {message}")]
    Parse {
        /// The provider whose body failed to decode
        provider: String,
        /// The decoder error message
        message: String,
    },

    /// The provider does not implement the requested operation.
    #[error("{provider} does not support '{operation}'")]
    NotSupported {
        /// The unsupported operation
        operation: String,
        /// The provider that was asked
        provider: String,
    },

    /// No configured provider can handle the request.
    #[error("No providers available")]
    NoProvidersAvailable,

    /// All providers were tried and all failed.
    #[error("All providers failed")]
    AllProvidersFailed,
}

impl MarketDataError {
    /// Returns true when the error came from the upstream itself (quota,
    /// status, transport) rather than from the shape of its answer.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::HttpError { .. } | Self::Network { .. }
        )
    }

    /// Name of the provider that produced the error, when there is one.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::RateLimited { provider }
            | Self::NoData { provider, .. }
            | Self::InvalidQuote { provider, .. }
            | Self::HttpError { provider, .. }
            | Self::Network { provider, .. }
            | Self::Parse { provider, .. }
            | Self::NotSupported { provider, .. } => Some(provider),
            Self::NoProvidersAvailable | Self::AllProvidersFailed => None,
        }
    }

    /// Map a `reqwest` transport error for `provider`.
    pub fn from_transport(provider: &str, error: &reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timed out".to_string()
        } else {
            error.to_string()
        };
        Self::Network {
            provider: provider.to_string(),
            message,
        }
    }
}
