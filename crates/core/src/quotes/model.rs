//! Domain models returned by the market service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use financehub_market_data::{CryptoQuote, HistoricalPoint, Quote};

/// Where a dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataTier {
    /// Fetched from a provider on this call
    Live,
    /// Provider data served from the cache
    Cached,
    /// Static snapshot or generated series
    Synthetic,
}

/// A dataset tagged with its tier and the instant it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sourced<T> {
    pub data: T,
    pub tier: DataTier,
    pub as_of: DateTime<Utc>,
}

impl<T> Sourced<T> {
    pub fn new(data: T, tier: DataTier, as_of: DateTime<Utc>) -> Self {
        Self { data, tier, as_of }
    }

    /// How this value should be reported when read back from the cache.
    pub fn into_cached(self) -> Self {
        let tier = match self.tier {
            DataTier::Live | DataTier::Cached => DataTier::Cached,
            DataTier::Synthetic => DataTier::Synthetic,
        };
        Self { tier, ..self }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            data: f(self.data),
            tier: self.tier,
            as_of: self.as_of,
        }
    }
}

/// Everything the service keeps in its cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachePayload {
    Quotes(Sourced<Vec<Quote>>),
    Crypto(Sourced<Vec<CryptoQuote>>),
    History(Sourced<Vec<HistoricalPoint>>),
}

/// Aggregate view over a quote set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub total_market_cap: Decimal,
    pub gainers: usize,
    pub losers: usize,
    /// Mean of `change_percent`, rounded to two places
    pub average_change_percent: Decimal,
    pub top_gainer: Option<Quote>,
    pub top_loser: Option<Quote>,
}

impl MarketSummary {
    /// Summarize `quotes`. Returns `None` for an empty set.
    pub fn from_quotes(quotes: &[Quote]) -> Option<Self> {
        if quotes.is_empty() {
            return None;
        }

        let total_market_cap = quotes.iter().map(|q| q.market_cap).sum();
        let change_sum: Decimal = quotes.iter().map(|q| q.change_percent).sum();
        let average_change_percent = (change_sum / Decimal::from(quotes.len())).round_dp(2);

        let top_gainer = quotes
            .iter()
            .filter(|q| q.is_gainer())
            .max_by(|a, b| a.change_percent.cmp(&b.change_percent))
            .cloned();
        let top_loser = quotes
            .iter()
            .filter(|q| q.is_loser())
            .min_by(|a, b| a.change_percent.cmp(&b.change_percent))
            .cloned();

        Some(Self {
            total_market_cap,
            gainers: quotes.iter().filter(|q| q.is_gainer()).count(),
            losers: quotes.iter().filter(|q| q.is_loser()).count(),
            average_change_percent,
            top_gainer,
            top_loser,
        })
    }
}
