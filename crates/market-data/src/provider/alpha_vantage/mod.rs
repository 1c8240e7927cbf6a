//! Alpha Vantage market data provider implementation.
//!
//! This module provides market data from Alpha Vantage API:
//! - Current equity quotes via GLOBAL_QUOTE endpoint
//! - Daily equity closes via TIME_SERIES_DAILY endpoint
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute and the
//! `demo` key only serves a handful of symbols. Both conditions come back as
//! an HTTP 200 with a `Note` or `Information` marker in the body.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{HistoricalPoint, Quote};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://www.alphavantage.co";
const QUERY_PATH: &str = "/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Alpha Vantage market data provider.
///
/// Primary equities source. Company names and market caps are not available
/// from GLOBAL_QUOTE, so quotes carry the symbol as name and a zero market cap.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// GLOBAL_QUOTE response
#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// Unknown symbols come back as `"Global Quote": {}`, so every field is optional.
#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "03. high")]
    high: Option<String>,
    #[serde(rename = "04. low")]
    low: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

/// TIME_SERIES_DAILY response for equities
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyQuote>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyQuote {
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: Option<String>,
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Create a provider that talks to a different host (mirrors, tests).
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));

        let endpoint = format!("{}{}", self.base_url, QUERY_PATH);
        let url = reqwest::Url::parse_with_params(&endpoint, &all_params).map_err(|e| {
            MarketDataError::Parse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })?;

        debug!(
            "Alpha Vantage request: {}",
            url.as_str().replace(&self.api_key, "***")
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, &e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

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

    /// Check for the error markers Alpha Vantage embeds in successful responses.
    ///
    /// `Note` and `Information` mean the key is throttled or restricted;
    /// `Error Message` means the call was understood but yields nothing.
    fn check_api_error(
        error_message: &Option<String>,
        note: &Option<String>,
        information: &Option<String>,
    ) -> Result<(), MarketDataError> {
        if let Some(ref msg) = error_message {
            return Err(MarketDataError::NoData {
                provider: PROVIDER_ID.to_string(),
                message: msg.clone(),
            });
        }

        if let Some(ref msg) = note.as_ref().or(information.as_ref()) {
            warn!("Alpha Vantage throttled the request: {}", msg);
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        Ok(())
    }

    /// Parse a date string in YYYY-MM-DD format.
    fn parse_date(date_str: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
    }

    /// Parse a decimal value from a string.
    fn parse_decimal(s: &str) -> Option<Decimal> {
        Decimal::from_str(s.trim()).ok()
    }

    /// Parse a percent string such as "1.2400%".
    fn parse_percent(s: &str) -> Option<Decimal> {
        Self::parse_decimal(s.trim().trim_end_matches('%'))
    }

    /// Parse a volume string, tolerating a decimal representation.
    fn parse_volume(s: &str) -> Option<u64> {
        let trimmed = s.trim();
        trimmed.parse::<u64>().ok().or_else(|| {
            Self::parse_decimal(trimmed)
                .filter(|d| !d.is_sign_negative())
                .and_then(|d| d.trunc().to_u64())
        })
    }

    fn optional_decimal(field: &Option<String>) -> Decimal {
        field
            .as_deref()
            .and_then(Self::parse_decimal)
            .unwrap_or(Decimal::ZERO)
    }

    /// Map a decoded GLOBAL_QUOTE body into a normalized quote.
    fn quote_from_response(
        symbol: &str,
        response: GlobalQuoteResponse,
    ) -> Result<Quote, MarketDataError> {
        Self::check_api_error(
            &response.error_message,
            &response.note,
            &response.information,
        )?;

        let no_quote = || MarketDataError::NoData {
            provider: PROVIDER_ID.to_string(),
            message: format!("No quote data for symbol: {}", symbol),
        };

        let global = response.global_quote.ok_or_else(no_quote)?;
        let price = global
            .price
            .as_deref()
            .and_then(Self::parse_decimal)
            .ok_or_else(no_quote)?;

        let quote = Quote {
            symbol: global
                .symbol
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| symbol.to_string()),
            name: symbol.to_string(),
            price,
            change: Self::optional_decimal(&global.change),
            change_percent: global
                .change_percent
                .as_deref()
                .and_then(Self::parse_percent)
                .unwrap_or(Decimal::ZERO),
            volume: global
                .volume
                .as_deref()
                .and_then(Self::parse_volume)
                .unwrap_or(0),
            high: Self::optional_decimal(&global.high),
            low: Self::optional_decimal(&global.low),
            market_cap: Decimal::ZERO,
        };

        Ok(quote.with_consistent_sign())
    }

    /// Map a decoded TIME_SERIES_DAILY body into the newest `days` points,
    /// oldest first.
    fn series_from_response(
        symbol: &str,
        days: u32,
        response: TimeSeriesResponse,
    ) -> Result<Vec<HistoricalPoint>, MarketDataError> {
        Self::check_api_error(
            &response.error_message,
            &response.note,
            &response.information,
        )?;

        let time_series = response.time_series.ok_or_else(|| MarketDataError::NoData {
            provider: PROVIDER_ID.to_string(),
            message: format!("No time series for symbol: {}", symbol),
        })?;

        let mut points: Vec<HistoricalPoint> = time_series
            .into_iter()
            .filter_map(|(date_str, daily)| {
                let date = Self::parse_date(&date_str)?;
                let price = Self::parse_decimal(&daily.close)?;
                let volume = daily.volume.as_deref().and_then(Self::parse_volume);
                Some(HistoricalPoint::new(date, price, volume))
            })
            .collect();

        // Newest first, keep `days`, then flip to ascending
        points.sort_by(|a, b| b.date.cmp(&a.date));
        points.truncate(days as usize);
        points.reverse();

        if points.is_empty() {
            return Err(MarketDataError::NoData {
                provider: PROVIDER_ID.to_string(),
                message: format!("Empty time series for symbol: {}", symbol),
            });
        }

        Ok(points)
    }

    fn decode<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, MarketDataError> {
        serde_json::from_str(text).map_err(|e| MarketDataError::Parse {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse response: {}", e),
        })
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        // Primary equities source
        1
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_latest: true,
            supports_historical: true,
        }
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Alpha Vantage", symbol);

        let params = [("function", "GLOBAL_QUOTE"), ("symbol", symbol)];
        let text = self.fetch(&params).await?;
        let response: GlobalQuoteResponse = Self::decode(&text)?;

        Self::quote_from_response(symbol, response)
    }

    async fn get_historical(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<HistoricalPoint>, MarketDataError> {
        debug!(
            "Fetching {} days of history for {} from Alpha Vantage",
            days, symbol
        );

        let params = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", "compact"), // TIME_SERIES_DAILY: 'full' is premium-only
        ];
        let text = self.fetch(&params).await?;
        let response: TimeSeriesResponse = Self::decode(&text)?;

        let points = Self::series_from_response(symbol, days, response)?;

        debug!(
            "Alpha Vantage: fetched {} daily closes for {}",
            points.len(),
            symbol
        );

        Ok(points)
    }
}

// ============================================================================
// Tests
// ============================================================================
