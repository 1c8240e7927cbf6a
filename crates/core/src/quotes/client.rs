//! Market Data Client - Facade for the market-data crate.
//!
//! This module provides a clean interface between the market service and the
//! market-data crate's provider system.
//!
//! ```text
//! MarketService ─▶ MarketDataClient ─┬─▶ ProviderRegistry ─▶ AlphaVantage, Finnhub
//!                                    └─▶ CryptoDataProvider ─▶ CoinGecko
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use crate::quotes::constants::*;
use crate::settings::ProviderKeys;

use financehub_market_data::{
    call_with_timeout, AlphaVantageProvider, CoinGeckoProvider, CryptoDataProvider, CryptoQuote,
    FinnhubProvider, HistoricalPoint, MarketDataError, MarketDataProvider, ProviderRegistry,
    Quote,
};

/// Market data client - facade for fetching quotes via the market-data crate.
///
/// Handles:
/// - Provider initialization with API keys
/// - Routing equity requests through the registry's fallback chain
/// - Bounding crypto calls with the same timeout as equity calls
pub struct MarketDataClient {
    registry: ProviderRegistry,
    crypto: Arc<dyn CryptoDataProvider>,
}

impl MarketDataClient {
    /// Create a client backed by the public upstream APIs.
    pub fn new(keys: &ProviderKeys, timeout: Duration) -> Self {
        let providers: Vec<Arc<dyn MarketDataProvider>> =
            [DATA_SOURCE_ALPHA_VANTAGE, DATA_SOURCE_FINNHUB]
                .iter()
                .filter_map(|id| Self::create_provider(id, keys))
                .collect();

        Self::with_providers(providers, Arc::new(CoinGeckoProvider::new()), timeout)
    }

    /// Create a client over explicit providers.
    pub fn with_providers(
        providers: Vec<Arc<dyn MarketDataProvider>>,
        crypto: Arc<dyn CryptoDataProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry: ProviderRegistry::new(providers, timeout),
            crypto,
        }
    }

    fn create_provider(id: &str, keys: &ProviderKeys) -> Option<Arc<dyn MarketDataProvider>> {
        match id {
            DATA_SOURCE_ALPHA_VANTAGE => {
                if keys.uses_demo_key() {
                    info!("ALPHA_VANTAGE_API_KEY not set, using the demo key");
                }
                Some(Arc::new(AlphaVantageProvider::new(keys.alpha_vantage.clone())))
            }
            DATA_SOURCE_FINNHUB => {
                if keys.finnhub.is_none() {
                    debug!("Provider {} requires API key but none found, it will be skipped", id);
                }
                Some(Arc::new(FinnhubProvider::new(keys.finnhub.clone())))
            }
            _ => None,
        }
    }

    /// Equity provider ids in fallback order, with whether each is usable.
    pub fn providers(&self) -> Vec<(&'static str, bool)> {
        self.registry
            .providers()
            .iter()
            .map(|p| (p.id(), p.is_configured()))
            .collect()
    }

    pub fn crypto_provider_id(&self) -> &'static str {
        self.crypto.id()
    }

    pub async fn latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.registry.fetch_latest_quote(symbol).await
    }

    pub async fn historical(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<HistoricalPoint>, MarketDataError> {
        self.registry.fetch_historical(symbol, days).await
    }

    pub async fn crypto_markets(&self, limit: u32) -> Result<Vec<CryptoQuote>, MarketDataError> {
        call_with_timeout(
            self.crypto.id(),
            self.registry.timeout(),
            self.crypto.get_markets(limit),
        )
        .await
    }

    pub async fn crypto_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<Vec<HistoricalPoint>, MarketDataError> {
        call_with_timeout(
            self.crypto.id(),
            self.registry.timeout(),
            self.crypto.get_market_chart(coin_id, days),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_orders_providers() {
        let keys = ProviderKeys::new(Some("av".to_string()), Some("fh".to_string()));
        let client = MarketDataClient::new(&keys, PROVIDER_TIMEOUT);

        assert_eq!(
            client.providers(),
            vec![(DATA_SOURCE_ALPHA_VANTAGE, true), (DATA_SOURCE_FINNHUB, true)]
        );
        assert_eq!(client.crypto_provider_id(), DATA_SOURCE_COINGECKO);
    }

    #[test]
    fn test_factory_without_finnhub_key() {
        let client = MarketDataClient::new(&ProviderKeys::default(), PROVIDER_TIMEOUT);

        assert_eq!(
            client.providers(),
            vec![(DATA_SOURCE_ALPHA_VANTAGE, true), (DATA_SOURCE_FINNHUB, false)]
        );
    }
}
