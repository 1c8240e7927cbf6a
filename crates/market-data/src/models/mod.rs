//! Market data models
//!
//! This module contains the normalized data types every provider maps into:
//! - `types` - Type aliases for common identifiers (ProviderId)
//! - `quote` - Current equity snapshot (Quote)
//! - `crypto` - Current crypto snapshot (CryptoQuote)
//! - `history` - Daily closing prices (HistoricalPoint)

mod crypto;
mod history;
mod quote;
mod types;

pub use crypto::CryptoQuote;
pub use history::{is_strictly_ascending, HistoricalPoint};
pub use quote::Quote;
pub use types::ProviderId;
