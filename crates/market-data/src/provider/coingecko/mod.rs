//! CoinGecko market data provider implementation.
//!
//! - Ranked market listing via /coins/markets
//! - Daily price history via /coins/{id}/market_chart
//!
//! The public API needs no key but throttles aggressively (HTTP 429).

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{CryptoQuote, HistoricalPoint};
use crate::provider::CryptoDataProvider;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER_ID: &str = "COINGECKO";

/// One row of the /coins/markets listing. Numeric fields are null for
/// thinly traded coins.
#[derive(Debug, Deserialize)]
struct MarketRow {
    id: String,
    symbol: String,
    name: String,
    current_price: Option<f64>,
    price_change_24h: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
    high_24h: Option<f64>,
    low_24h: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// `[ms_timestamp, price]` pairs
    prices: Option<Vec<(f64, f64)>>,
}

/// CoinGecko crypto market data provider.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Create a provider that talks to a different host (mirrors, tests).
    pub fn with_base_url(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("CoinGecko request: {}", endpoint);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::HttpError {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, &e))
    }

    fn to_decimal(value: Option<f64>) -> Decimal {
        value
            .and_then(|v| Decimal::try_from(v).ok())
            .unwrap_or(Decimal::ZERO)
    }

    fn quote_from_row(row: MarketRow) -> CryptoQuote {
        CryptoQuote {
            id: row.id,
            symbol: row.symbol,
            name: row.name,
            current_price: Self::to_decimal(row.current_price),
            price_change_24h: Self::to_decimal(row.price_change_24h),
            price_change_percentage_24h: Self::to_decimal(row.price_change_percentage_24h),
            market_cap: Self::to_decimal(row.market_cap),
            total_volume: Self::to_decimal(row.total_volume),
            high_24h: Self::to_decimal(row.high_24h),
            low_24h: Self::to_decimal(row.low_24h),
        }
    }

    /// Collapse `[ms, price]` samples to one point per calendar day (UTC),
    /// keeping the last sample of each day, then keep the newest `days`.
    fn daily_points(prices: &[(f64, f64)], days: u32) -> Vec<HistoricalPoint> {
        let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

        let mut samples: Vec<&(f64, f64)> = prices.iter().collect();
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (ms, price) in samples {
            let Some(date) = DateTime::from_timestamp_millis(*ms as i64).map(|dt| dt.date_naive())
            else {
                continue;
            };
            if let Ok(price) = Decimal::try_from(*price) {
                by_day.insert(date, price);
            }
        }

        let skip = by_day.len().saturating_sub(days as usize);
        by_day
            .into_iter()
            .skip(skip)
            .map(|(date, price)| HistoricalPoint::new(date, price, None))
            .collect()
    }
}

#[async_trait]
impl CryptoDataProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_markets(&self, limit: u32) -> Result<Vec<CryptoQuote>, MarketDataError> {
        let per_page = limit.to_string();
        let params = [
            ("vs_currency", "usd"),
            ("order", "market_cap_desc"),
            ("per_page", per_page.as_str()),
            ("page", "1"),
            ("sparkline", "false"),
            ("price_change_percentage", "24h"),
        ];

        let text = self.fetch("/coins/markets", &params).await?;
        let rows: Vec<MarketRow> =
            serde_json::from_str(&text).map_err(|e| MarketDataError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse markets response: {}", e),
            })?;

        if rows.is_empty() {
            return Err(MarketDataError::NoData {
                provider: PROVIDER_ID.to_string(),
                message: "Empty market listing".to_string(),
            });
        }

        Ok(rows
            .into_iter()
            .take(limit as usize)
            .map(Self::quote_from_row)
            .collect())
    }

    async fn get_market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<Vec<HistoricalPoint>, MarketDataError> {
        let endpoint = format!("/coins/{}/market_chart", coin_id);
        let days_param = days.to_string();
        let params = [
            ("vs_currency", "usd"),
            ("days", days_param.as_str()),
            ("interval", "daily"),
        ];

        let text = self.fetch(&endpoint, &params).await?;
        let response: MarketChartResponse =
            serde_json::from_str(&text).map_err(|e| MarketDataError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse market chart response: {}", e),
            })?;

        let prices = response.prices.ok_or_else(|| MarketDataError::NoData {
            provider: PROVIDER_ID.to_string(),
            message: format!("No prices for coin: {}", coin_id),
        })?;

        let points = Self::daily_points(&prices, days);
        if points.is_empty() {
            return Err(MarketDataError::NoData {
                provider: PROVIDER_ID.to_string(),
                message: format!("Empty price history for coin: {}", coin_id),
            });
        }

        debug!("CoinGecko: {} daily prices for {}", points.len(), coin_id);
        Ok(points)
    }
}
