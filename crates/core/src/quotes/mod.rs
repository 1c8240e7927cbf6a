//! Market quotes module.
//!
//! This module provides the market service and the pieces it is built from:
//!
//! - [`model`] - Tiered results, cache payloads and the market summary
//! - [`client`] - Market data client facade for the market-data crate
//! - [`fallback`] - Static equity and crypto snapshots
//! - [`synthetic`] - Generated daily series
//! - [`service`] - The total market service used by the presentation layer
//! - [`constants`] - Watch list, TTLs and cache keys
//!
//! # Architecture
//!
//! ```text
//! MarketService → MarketDataClient → market-data crate (providers)
//!       ↓                ↓ (on failure)
//!    TtlCache     fallback / synthetic
//! ```

pub mod client;
pub mod constants;
pub mod fallback;
pub mod model;
pub mod service;
pub mod synthetic;


pub use client::MarketDataClient;
pub use model::{CachePayload, DataTier, MarketSummary, Sourced};
pub use service::{MarketService, MarketServiceTrait};
pub use synthetic::SyntheticGenerator;
