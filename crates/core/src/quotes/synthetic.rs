//! Synthetic daily series for when no provider can serve history.
//!
//! Prices drift upward from 95% toward 105% of the base price over the
//! window, with up to 2.5% of uniform noise per day.

use std::sync::Mutex;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use financehub_market_data::HistoricalPoint;

use super::constants::SYNTHETIC_DEFAULT_BASE_PRICE;
use super::fallback::snapshot_price;

const NOISE: f64 = 0.025;
const VOLUME_RANGE: std::ops::Range<u64> = 10_000_000..60_000_000;

pub struct SyntheticGenerator {
    rng: Mutex<StdRng>,
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticGenerator {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Base price used for `symbol`.
    pub fn base_price(symbol: &str) -> Decimal {
        snapshot_price(symbol).unwrap_or_else(|| Decimal::from(SYNTHETIC_DEFAULT_BASE_PRICE))
    }

    /// `days + 1` ascending points ending on `today`.
    pub fn series(&self, symbol: &str, days: u32, today: NaiveDate) -> Vec<HistoricalPoint> {
        let base = Self::base_price(symbol);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        (0..=days)
            .rev()
            .filter_map(|days_ago| {
                let date = today.checked_sub_days(Days::new(u64::from(days_ago)))?;
                let trend = if days == 0 {
                    Decimal::ONE
                } else {
                    Decimal::from(days - days_ago) / Decimal::from(days)
                };
                let noise = Decimal::try_from(rng.gen_range(-NOISE..=NOISE))
                    .unwrap_or(Decimal::ZERO);
                let factor = dec!(0.95) + trend * dec!(0.10) + noise;
                let price = (base * factor).round_dp(2);
                let volume = rng.gen_range(VOLUME_RANGE);
                Some(HistoricalPoint::new(date, price, Some(volume)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use financehub_market_data::is_strictly_ascending;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_series_shape() {
        let generator = SyntheticGenerator::seeded(7);
        let series = generator.series("AAPL", 30, today());

        assert_eq!(series.len(), 31);
        assert!(is_strictly_ascending(&series));
        assert_eq!(series.last().unwrap().date, today());
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2023, 12, 16).unwrap());
    }

    #[test]
    fn test_prices_within_band() {
        let generator = SyntheticGenerator::seeded(42);
        let base = dec!(175.43);

        for _ in 0..20 {
            let series = generator.series("AAPL", 30, today());
            for point in &series {
                assert!(point.price >= (base * dec!(0.925)).round_dp(2));
                assert!(point.price <= (base * dec!(1.075)).round_dp(2));
                assert_eq!(point.price, point.price.round_dp(2));
            }
            let day0 = series.last().unwrap().price;
            assert!(day0 >= base * dec!(0.925) && day0 <= base * dec!(1.10));
        }
    }

    #[test]
    fn test_volume_range() {
        let generator = SyntheticGenerator::seeded(3);
        for point in generator.series("MSFT", 90, today()) {
            let volume = point.volume.unwrap();
            assert!((10_000_000..60_000_000).contains(&volume));
        }
    }

    #[test]
    fn test_zero_days_is_single_point_today() {
        let generator = SyntheticGenerator::seeded(1);
        let series = generator.series("TSLA", 0, today());

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, today());
        let base = dec!(248.73);
        assert!(series[0].price >= (base * dec!(1.025)).round_dp(2));
        assert!(series[0].price <= (base * dec!(1.075)).round_dp(2));
    }

    #[test]
    fn test_base_price_resolution() {
        assert_eq!(SyntheticGenerator::base_price("NVDA"), dec!(875.25));
        assert_eq!(SyntheticGenerator::base_price("sol"), dec!(98.34));
        assert_eq!(SyntheticGenerator::base_price("ZZZZ"), dec!(100));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SyntheticGenerator::seeded(99).series("AAPL", 10, today());
        let b = SyntheticGenerator::seeded(99).series("AAPL", 10, today());
        assert_eq!(a, b);
    }
}
