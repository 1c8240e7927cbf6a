use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalized current-price snapshot for a cryptocurrency asset.
///
/// `id` is the stable join key; ticker symbols may collide across assets.
/// Field names follow the upstream schema so the presentation layer can use
/// them unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CryptoQuote {
    /// Coin identifier slug (e.g. "bitcoin")
    pub id: String,
    /// Ticker symbol (e.g. "btc")
    pub symbol: String,
    pub name: String,
    pub current_price: Decimal,
    pub price_change_24h: Decimal,
    pub price_change_percentage_24h: Decimal,
    pub market_cap: Decimal,
    pub total_volume: Decimal,
    pub high_24h: Decimal,
    pub low_24h: Decimal,
}
