//! Market service constants.

use std::time::Duration;

/// Data source identifiers
pub const DATA_SOURCE_ALPHA_VANTAGE: &str = "ALPHA_VANTAGE";
pub const DATA_SOURCE_FINNHUB: &str = "FINNHUB";
pub const DATA_SOURCE_COINGECKO: &str = "COINGECKO";

/// Equity symbols shown on the dashboard, in display order.
pub const WATCH_LIST: [&str; 8] = [
    "AAPL", "GOOGL", "MSFT", "TSLA", "AMZN", "NVDA", "META", "NFLX",
];

/// Crypto tickers routed to the crypto market chart, with their coin ids.
pub const CRYPTO_COIN_IDS: [(&str, &str); 4] = [
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("ADA", "cardano"),
    ("SOL", "solana"),
];

pub const CACHE_TTL: Duration = Duration::from_secs(60);

/// Bound on a single provider call, shared with the registry default.
pub const PROVIDER_TIMEOUT: Duration = financehub_market_data::DEFAULT_PROVIDER_TIMEOUT;

pub const CRYPTO_MARKET_LIMIT: u32 = 10;

pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Longest series a caller may ask for.
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Base price for synthetic series of symbols without a snapshot.
pub const SYNTHETIC_DEFAULT_BASE_PRICE: u32 = 100;

/// Cache keys
pub const CACHE_KEY_QUOTES: &str = "quotes";
pub const CACHE_KEY_CRYPTO: &str = "crypto";

pub fn history_cache_key(symbol: &str, days: u32) -> String {
    format!("history:{}:{}", symbol, days)
}

/// Coin id for a crypto ticker, case-insensitive.
pub fn coin_id_for(symbol: &str) -> Option<&'static str> {
    CRYPTO_COIN_IDS
        .iter()
        .find(|(ticker, _)| ticker.eq_ignore_ascii_case(symbol))
        .map(|(_, id)| *id)
}
