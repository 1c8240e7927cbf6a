//! Market service - the facade the presentation layer talks to.
//!
//! Every operation is total: provider failures are logged and replaced by the
//! static snapshots or a synthetic series, and the returned [`Sourced`]
//! envelope says which tier the data came from.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, info, warn};

use financehub_market_data::{CryptoQuote, HistoricalPoint, Quote};

use super::client::MarketDataClient;
use super::constants::{coin_id_for, history_cache_key, CACHE_KEY_CRYPTO, CACHE_KEY_QUOTES};
use super::fallback::{snapshot_crypto, snapshot_quotes};
use super::model::{CachePayload, DataTier, MarketSummary, Sourced};
use super::synthetic::SyntheticGenerator;
use crate::cache::TtlCache;
use crate::settings::MarketSettings;
use crate::utils::{Clock, SystemClock};

/// Trait defining the contract for market data operations.
#[async_trait]
pub trait MarketServiceTrait: Send + Sync {
    /// Quotes for the watch list, in watch-list order. Never empty.
    async fn get_quotes(&self) -> Sourced<Vec<Quote>>;

    /// The crypto market listing. Never empty.
    async fn get_crypto(&self) -> Sourced<Vec<CryptoQuote>>;

    /// The newest `days` daily closes for a symbol, ascending.
    async fn get_historical(&self, symbol: &str, days: u32) -> Sourced<Vec<HistoricalPoint>>;

    /// Watch-list quotes whose symbol or name contains `query`, ignoring case.
    async fn search(&self, query: &str) -> Sourced<Vec<Quote>>;

    async fn market_summary(&self) -> Sourced<Option<MarketSummary>>;

    /// Warm the quote and crypto cache entries.
    async fn refresh(&self) -> (DataTier, DataTier);

    fn settings(&self) -> &MarketSettings;
}

/// Market service backed by a [`MarketDataClient`] and a TTL cache.
pub struct MarketService {
    client: MarketDataClient,
    cache: Arc<TtlCache<CachePayload>>,
    synthetic: SyntheticGenerator,
    clock: Arc<dyn Clock>,
    settings: MarketSettings,
}

impl MarketService {
    /// Service on the system clock with its own cache.
    pub fn new(client: MarketDataClient, settings: MarketSettings) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = Arc::new(TtlCache::new(settings.cache_ttl, clock.clone()));
        Self::with_components(client, cache, SyntheticGenerator::new(), clock, settings)
    }

    /// Service over caller-provided parts. `clock` should be the cache's clock.
    pub fn with_components(
        client: MarketDataClient,
        cache: Arc<TtlCache<CachePayload>>,
        synthetic: SyntheticGenerator,
        clock: Arc<dyn Clock>,
        settings: MarketSettings,
    ) -> Self {
        Self {
            client,
            cache,
            synthetic,
            clock,
            settings,
        }
    }

    fn cached_quotes(&self) -> Option<Sourced<Vec<Quote>>> {
        match self.cache.get(CACHE_KEY_QUOTES)? {
            CachePayload::Quotes(quotes) => Some(quotes.into_cached()),
            _ => None,
        }
    }

    fn cached_crypto(&self) -> Option<Sourced<Vec<CryptoQuote>>> {
        match self.cache.get(CACHE_KEY_CRYPTO)? {
            CachePayload::Crypto(coins) => Some(coins.into_cached()),
            _ => None,
        }
    }

    fn cached_history(&self, key: &str) -> Option<Sourced<Vec<HistoricalPoint>>> {
        match self.cache.get(key)? {
            CachePayload::History(series) => Some(series.into_cached()),
            _ => None,
        }
    }

    async fn fetch_quotes(&self) -> Sourced<Vec<Quote>> {
        let attempts = self
            .settings
            .watch_list
            .iter()
            .map(|symbol| self.client.latest_quote(symbol));

        let results = join_all(attempts).await;

        let mut quotes = Vec::with_capacity(results.len());
        for (symbol, result) in self.settings.watch_list.iter().zip(results) {
            match result {
                Ok(quote) => quotes.push(quote),
                Err(e) => warn!("No live quote for {}: {}", symbol, e),
            }
        }

        let now = self.clock.now();
        if quotes.is_empty() {
            warn!("All quote providers failed, serving the static snapshot");
            Sourced::new(snapshot_quotes(), DataTier::Synthetic, now)
        } else {
            info!(
                "Fetched {} of {} watch-list quotes",
                quotes.len(),
                self.settings.watch_list.len()
            );
            Sourced::new(quotes, DataTier::Live, now)
        }
    }

    async fn fetch_crypto(&self) -> Sourced<Vec<CryptoQuote>> {
        let now = self.clock.now();
        match self.client.crypto_markets(self.settings.crypto_limit).await {
            Ok(coins) if !coins.is_empty() => Sourced::new(coins, DataTier::Live, now),
            Ok(_) => {
                warn!("Crypto listing was empty, serving the static snapshot");
                Sourced::new(snapshot_crypto(), DataTier::Synthetic, now)
            }
            Err(e) => {
                warn!("Crypto listing failed: {}, serving the static snapshot", e);
                Sourced::new(snapshot_crypto(), DataTier::Synthetic, now)
            }
        }
    }

    async fn fetch_history(&self, symbol: &str, days: u32) -> Sourced<Vec<HistoricalPoint>> {
        let result = match coin_id_for(symbol) {
            Some(coin_id) => self.client.crypto_chart(coin_id, days).await,
            None => self.client.historical(symbol, days).await,
        };

        let now = self.clock.now();
        match result {
            Ok(series) if !series.is_empty() => Sourced::new(series, DataTier::Live, now),
            Ok(_) => {
                warn!("Empty history for {}, generating a synthetic series", symbol);
                self.synthetic_history(symbol, days)
            }
            Err(e) => {
                warn!(
                    "History for {} unavailable: {}, generating a synthetic series",
                    symbol, e
                );
                self.synthetic_history(symbol, days)
            }
        }
    }

    fn synthetic_history(&self, symbol: &str, days: u32) -> Sourced<Vec<HistoricalPoint>> {
        let series = self.synthetic.series(symbol, days, self.clock.today());
        Sourced::new(series, DataTier::Synthetic, self.clock.now())
    }
}

#[async_trait]
impl MarketServiceTrait for MarketService {
    async fn get_quotes(&self) -> Sourced<Vec<Quote>> {
        if let Some(cached) = self.cached_quotes() {
            debug!("Quotes served from cache");
            return cached;
        }

        let fresh = self.fetch_quotes().await;
        self.cache.set(CACHE_KEY_QUOTES, CachePayload::Quotes(fresh.clone()));
        fresh
    }

    async fn get_crypto(&self) -> Sourced<Vec<CryptoQuote>> {
        if let Some(cached) = self.cached_crypto() {
            debug!("Crypto served from cache");
            return cached;
        }

        let fresh = self.fetch_crypto().await;
        self.cache.set(CACHE_KEY_CRYPTO, CachePayload::Crypto(fresh.clone()));
        fresh
    }

    async fn get_historical(&self, symbol: &str, days: u32) -> Sourced<Vec<HistoricalPoint>> {
        let symbol = symbol.trim().to_uppercase();
        let key = history_cache_key(&symbol, days);

        if let Some(cached) = self.cached_history(&key) {
            debug!("History for {} ({} days) served from cache", symbol, days);
            return cached;
        }

        let fresh = self.fetch_history(&symbol, days).await;
        self.cache.set(key, CachePayload::History(fresh.clone()));
        fresh
    }

    async fn search(&self, query: &str) -> Sourced<Vec<Quote>> {
        let needle = query.trim().to_lowercase();
        self.get_quotes().await.map(|quotes| {
            quotes
                .into_iter()
                .filter(|q| {
                    q.symbol.to_lowercase().contains(&needle)
                        || q.name.to_lowercase().contains(&needle)
                })
                .collect()
        })
    }

    async fn market_summary(&self) -> Sourced<Option<MarketSummary>> {
        self.get_quotes()
            .await
            .map(|quotes| MarketSummary::from_quotes(&quotes))
    }

    async fn refresh(&self) -> (DataTier, DataTier) {
        let (quotes, crypto) = futures::join!(self.get_quotes(), self.get_crypto());
        (quotes.tier, crypto.tier)
    }

    fn settings(&self) -> &MarketSettings {
        &self.settings
    }
}
