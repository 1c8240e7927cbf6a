//! Market data provider trait definitions.
//!
//! Equities and crypto come from upstreams with very different shapes, so
//! there are two seams:
//! - [`MarketDataProvider`] for per-symbol equity quotes and daily series,
//!   ordered and iterated by the registry
//! - [`CryptoDataProvider`] for the bulk crypto market listing and its
//!   market charts

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{CryptoQuote, HistoricalPoint, Quote};

use super::capabilities::ProviderCapabilities;

/// Trait for equity market data providers.
///
/// Implement this trait to add support for a new equities source.
/// The registry uses the provider's priority to order the fallback chain,
/// and skips providers reporting `is_configured() == false`.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use financehub_market_data::provider::{MarketDataProvider, ProviderCapabilities};
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities::default()
///     }
///
///     async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "ALPHA_VANTAGE", "FINNHUB", etc.
    /// Used for logging and fetch diagnostics.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering.
    ///
    /// Lower values = higher priority. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Whether the provider has what it needs (e.g. an API key) to be called.
    ///
    /// Unconfigured providers are skipped, not counted as failures.
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetch the current quote for a ticker symbol.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch the most recent `days` daily closes for a ticker symbol.
    ///
    /// The series must be returned in ascending date order.
    /// Default implementation returns `NotSupported`.
    async fn get_historical(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<HistoricalPoint>, MarketDataError> {
        let _ = (symbol, days);
        Err(MarketDataError::NotSupported {
            operation: "historical".to_string(),
            provider: self.id().to_string(),
        })
    }
}

/// Trait for cryptocurrency market data providers.
#[async_trait]
pub trait CryptoDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    fn id(&self) -> &'static str;

    /// Fetch up to `limit` assets ranked by market capitalization, descending.
    async fn get_markets(&self, limit: u32) -> Result<Vec<CryptoQuote>, MarketDataError>;

    /// Fetch the most recent `days` daily prices for a coin identifier,
    /// in ascending date order.
    async fn get_market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<Vec<HistoricalPoint>, MarketDataError>;
}
