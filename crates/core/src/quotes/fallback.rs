//! Static market snapshots served when every provider fails.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use financehub_market_data::{CryptoQuote, Quote};

struct StockRow {
    symbol: &'static str,
    name: &'static str,
    price: Decimal,
    change: Decimal,
    change_percent: Decimal,
    volume: u64,
    high: Decimal,
    low: Decimal,
    market_cap: Decimal,
}

struct CoinRow {
    id: &'static str,
    symbol: &'static str,
    name: &'static str,
    price: Decimal,
    change_24h: Decimal,
    change_percent_24h: Decimal,
    market_cap: Decimal,
    volume: Decimal,
    high_24h: Decimal,
    low_24h: Decimal,
}

const STOCKS: [StockRow; 6] = [
    StockRow {
        symbol: "AAPL",
        name: "Apple Inc.",
        price: dec!(175.43),
        change: dec!(2.15),
        change_percent: dec!(1.24),
        volume: 45_234_567,
        high: dec!(176.80),
        low: dec!(173.20),
        market_cap: dec!(2780000000000),
    },
    StockRow {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        price: dec!(142.56),
        change: dec!(-1.23),
        change_percent: dec!(-0.86),
        volume: 23_456_789,
        high: dec!(144.20),
        low: dec!(141.80),
        market_cap: dec!(1800000000000),
    },
    StockRow {
        symbol: "MSFT",
        name: "Microsoft Corp.",
        price: dec!(378.85),
        change: dec!(5.67),
        change_percent: dec!(1.52),
        volume: 32_145_698,
        high: dec!(380.45),
        low: dec!(375.20),
        market_cap: dec!(2810000000000),
    },
    StockRow {
        symbol: "TSLA",
        name: "Tesla Inc.",
        price: dec!(248.73),
        change: dec!(-8.45),
        change_percent: dec!(-3.29),
        volume: 89_765_432,
        high: dec!(255.30),
        low: dec!(246.90),
        market_cap: dec!(790000000000),
    },
    StockRow {
        symbol: "AMZN",
        name: "Amazon.com Inc.",
        price: dec!(155.89),
        change: dec!(3.21),
        change_percent: dec!(2.10),
        volume: 54_321_098,
        high: dec!(157.45),
        low: dec!(153.60),
        market_cap: dec!(1620000000000),
    },
    StockRow {
        symbol: "NVDA",
        name: "NVIDIA Corp.",
        price: dec!(875.25),
        change: dec!(15.67),
        change_percent: dec!(1.82),
        volume: 67_890_123,
        high: dec!(882.40),
        low: dec!(865.30),
        market_cap: dec!(2150000000000),
    },
];

const COINS: [CoinRow; 4] = [
    CoinRow {
        id: "bitcoin",
        symbol: "BTC",
        name: "Bitcoin",
        price: dec!(43250.67),
        change_24h: dec!(1250.34),
        change_percent_24h: dec!(2.98),
        market_cap: dec!(847000000000),
        volume: dec!(23456789000),
        high_24h: dec!(43800.00),
        low_24h: dec!(42100.50),
    },
    CoinRow {
        id: "ethereum",
        symbol: "ETH",
        name: "Ethereum",
        price: dec!(2634.89),
        change_24h: dec!(-45.23),
        change_percent_24h: dec!(-1.69),
        market_cap: dec!(316000000000),
        volume: dec!(12345678000),
        high_24h: dec!(2689.45),
        low_24h: dec!(2598.30),
    },
    CoinRow {
        id: "cardano",
        symbol: "ADA",
        name: "Cardano",
        price: dec!(0.485),
        change_24h: dec!(0.023),
        change_percent_24h: dec!(4.98),
        market_cap: dec!(17200000000),
        volume: dec!(567890123),
        high_24h: dec!(0.492),
        low_24h: dec!(0.461),
    },
    CoinRow {
        id: "solana",
        symbol: "SOL",
        name: "Solana",
        price: dec!(98.34),
        change_24h: dec!(5.67),
        change_percent_24h: dec!(6.12),
        market_cap: dec!(42800000000),
        volume: dec!(1234567890),
        high_24h: dec!(101.23),
        low_24h: dec!(95.78),
    },
];

/// The six-quote equity snapshot.
pub fn snapshot_quotes() -> Vec<Quote> {
    STOCKS
        .iter()
        .map(|s| Quote {
            symbol: s.symbol.to_string(),
            name: s.name.to_string(),
            price: s.price,
            change: s.change,
            change_percent: s.change_percent,
            volume: s.volume,
            high: s.high,
            low: s.low,
            market_cap: s.market_cap,
        })
        .collect()
}

/// The four-coin crypto snapshot.
pub fn snapshot_crypto() -> Vec<CryptoQuote> {
    COINS
        .iter()
        .map(|c| CryptoQuote {
            id: c.id.to_string(),
            symbol: c.symbol.to_string(),
            name: c.name.to_string(),
            current_price: c.price,
            price_change_24h: c.change_24h,
            price_change_percentage_24h: c.change_percent_24h,
            market_cap: c.market_cap,
            total_volume: c.volume,
            high_24h: c.high_24h,
            low_24h: c.low_24h,
        })
        .collect()
}

/// Snapshot price for a symbol: equities first, then crypto tickers.
pub fn snapshot_price(symbol: &str) -> Option<Decimal> {
    STOCKS
        .iter()
        .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
        .map(|s| s.price)
        .or_else(|| {
            COINS
                .iter()
                .find(|c| c.symbol.eq_ignore_ascii_case(symbol))
                .map(|c| c.price)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_sizes() {
        assert_eq!(snapshot_quotes().len(), 6);
        assert_eq!(snapshot_crypto().len(), 4);
    }

    #[test]
    fn test_snapshot_signs_agree() {
        for q in snapshot_quotes() {
            assert_eq!(q.change.is_sign_negative(), q.change_percent.is_sign_negative());
        }
    }

    #[test]
    fn test_snapshot_price_lookup() {
        assert_eq!(snapshot_price("aapl"), Some(dec!(175.43)));
        assert_eq!(snapshot_price("BTC"), Some(dec!(43250.67)));
        assert_eq!(snapshot_price("META"), None);
    }
}
