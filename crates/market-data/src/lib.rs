//! FinanceHub Market Data Crate
//!
//! This crate provides provider-agnostic market data fetching for FinanceHub.
//!
//! # Overview
//!
//! - Normalized equity quotes, crypto quotes and daily series
//! - Multiple providers: Alpha Vantage, Finnhub, CoinGecko
//! - Priority-ordered fallback across equity providers, with per-call timeouts
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  ProviderRegistry|  (priority order, skip + timeout)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |    Provider      | --> |  Quote / Series  |  (normalized models)
//! +------------------+     +------------------+
//!   AlphaVantage, Finnhub
//!
//! +------------------+     +------------------+
//! | CryptoProvider   | --> |   CryptoQuote    |
//! +------------------+     +------------------+
//!   CoinGecko
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Equity snapshot
//! - [`CryptoQuote`] - Crypto snapshot
//! - [`HistoricalPoint`] - One daily close in an ascending series
//! - [`MarketDataError`] - Failure from a provider or the registry

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::MarketDataError;

// Re-export all public types from models
pub use models::{is_strictly_ascending, CryptoQuote, HistoricalPoint, ProviderId, Quote};

// Re-export provider types
pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::coingecko::CoinGeckoProvider;
pub use provider::finnhub::FinnhubProvider;
pub use provider::{CryptoDataProvider, MarketDataProvider, ProviderCapabilities};

// Re-export registry types
pub use registry::{
    call_with_timeout, FetchDiagnostics, ProviderAttempt, ProviderRegistry, SkipReason,
    DEFAULT_PROVIDER_TIMEOUT,
};
