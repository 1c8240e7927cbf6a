//! Provider capabilities.
//!
//! This module defines the structure describing what a market data provider
//! can do, so the registry can skip providers that cannot serve a request.

/// Describes the capabilities of a market data provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Whether the provider can return a current quote.
    pub supports_latest: bool,

    /// Whether the provider can return a daily historical series.
    pub supports_historical: bool,
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        Self {
            supports_latest: true,
            supports_historical: false,
        }
    }
}
