use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day of a historical price series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// Calendar day, no time component
    pub date: NaiveDate,

    /// Closing price
    pub price: Decimal,

    /// Traded volume, when the provider reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl HistoricalPoint {
    pub fn new(date: NaiveDate, price: Decimal, volume: Option<u64>) -> Self {
        Self {
            date,
            price,
            volume,
        }
    }
}

/// Returns true if every point is dated strictly after the one before it.
pub fn is_strictly_ascending(series: &[HistoricalPoint]) -> bool {
    series.windows(2).all(|pair| pair[0].date < pair[1].date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_ascending_series() {
        let series = vec![
            HistoricalPoint::new(day(2), dec!(100), None),
            HistoricalPoint::new(day(3), dec!(101), None),
            // Gaps are allowed
            HistoricalPoint::new(day(8), dec!(99), Some(1_000)),
        ];
        assert!(is_strictly_ascending(&series));
    }

    #[test]
    fn test_duplicate_dates_are_not_ascending() {
        let series = vec![
            HistoricalPoint::new(day(2), dec!(100), None),
            HistoricalPoint::new(day(2), dec!(101), None),
        ];
        assert!(!is_strictly_ascending(&series));
    }

    #[test]
    fn test_volume_omitted_when_absent() {
        let json = serde_json::to_value(HistoricalPoint::new(day(2), dec!(100), None)).unwrap();
        assert!(json.get("volume").is_none());
        assert_eq!(json["date"], "2024-01-02");
    }
}
