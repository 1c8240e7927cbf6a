//! FinanceHub Core - market service, cache and fallback data.
//!
//! This crate turns the providers of `financehub-market-data` into a total
//! service: cached, tiered, and backed by static snapshots and synthetic
//! series when upstreams fail.

pub mod cache;
pub mod quotes;
pub mod settings;
pub mod utils;

pub use cache::TtlCache;
pub use quotes::{
    DataTier, MarketDataClient, MarketService, MarketServiceTrait, MarketSummary, Sourced,
};
pub use settings::{MarketSettings, ProviderKeys};
pub use utils::{Clock, ManualClock, SystemClock};

// Re-export the normalized models so callers need only this crate
pub use financehub_market_data::{CryptoQuote, HistoricalPoint, Quote};
