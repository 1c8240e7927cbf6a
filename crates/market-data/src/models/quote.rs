use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalized current-price snapshot for a tradable equity.
///
/// `price = previous_close + change` is upstream-supplied and not checked,
/// but `change_percent` always carries the sign of `change`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol, unique within a quote set
    pub symbol: String,

    /// Display name (falls back to the symbol when the provider has none)
    pub name: String,

    /// Last traded price
    pub price: Decimal,

    /// Absolute change since the previous close
    pub change: Decimal,

    /// Percent change since the previous close
    pub change_percent: Decimal,

    /// Traded volume (zero when the endpoint does not report it)
    pub volume: u64,

    /// Day high
    pub high: Decimal,

    /// Day low
    pub low: Decimal,

    /// Market capitalization in currency units (zero when unknown)
    pub market_cap: Decimal,
}

impl Quote {
    /// Force `change_percent` to carry the sign of `change`.
    ///
    /// A zero `change` leaves the percent untouched.
    pub fn with_consistent_sign(mut self) -> Self {
        let magnitude = self.change_percent.abs();
        if self.change.is_sign_negative() && !self.change.is_zero() {
            self.change_percent = -magnitude;
        } else if self.change > Decimal::ZERO {
            self.change_percent = magnitude;
        }
        self
    }

    /// Returns true if the quote gained since the previous close.
    pub fn is_gainer(&self) -> bool {
        self.change_percent > Decimal::ZERO
    }

    /// Returns true if the quote lost since the previous close.
    pub fn is_loser(&self) -> bool {
        self.change_percent < Decimal::ZERO
    }
}
