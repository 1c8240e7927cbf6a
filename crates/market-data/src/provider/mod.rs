//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` and `CryptoDataProvider` traits
//! - Provider capabilities
//! - Concrete provider implementations (Alpha Vantage, Finnhub, CoinGecko)
//!
//! Providers translate one upstream schema into the normalized models and
//! fail with a `MarketDataError` otherwise. They never retry: a failed
//! attempt is final for that call, and the registry moves on.

mod capabilities;
mod traits;

pub mod alpha_vantage;
pub mod coingecko;
pub mod finnhub;

// Re-exports
pub use capabilities::ProviderCapabilities;
pub use traits::{CryptoDataProvider, MarketDataProvider};
