//! Finnhub market data provider implementation.
//!
//! This module provides market data from Finnhub API:
//! - Equities via /quote endpoint
//! - Company name and market cap via /stock/profile2 endpoint
//!
//! Finnhub free tier is limited to 60 API calls per minute and does not
//! serve daily candles, so this provider only answers latest quotes.
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// High price of the day
    h: Option<f64>,
    /// Low price of the day
    l: Option<f64>,
    /// Present on invalid tokens and malformed symbols
    error: Option<String>,
}

/// Response from /stock/profile2 endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    /// Company name
    name: Option<String>,
    /// Market capitalization (in millions)
    market_capitalization: Option<f64>,
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub market data provider.
///
/// Secondary equities source. Requires an API key; without one the provider
/// reports itself unconfigured and the registry skips it.
pub struct FinnhubProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Create a provider that talks to a different host (mirrors, tests).
    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Make a GET request to the Finnhub API.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MarketDataError::NotSupported {
                operation: "unauthenticated request".to_string(),
                provider: PROVIDER_ID.to_string(),
            })?;

        let url = format!("{}{}", self.base_url, endpoint);

        // Header auth keeps the key out of URLs and logs
        let request = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", api_key)
            .query(params);

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let response = request
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, &e))?;

        let status = response.status();

        // 403 is what Finnhub sends once the key's quota is spent
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::FORBIDDEN
        {
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

    /// Fetch the /quote body for a symbol.
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteResponse, MarketDataError> {
        let text = self.fetch("/quote", &[("symbol", symbol)]).await?;

        serde_json::from_str(&text).map_err(|e| MarketDataError::Parse {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse quote response: {}", e),
        })
    }

    /// Fetch the /stock/profile2 body for a symbol.
    async fn fetch_profile(&self, symbol: &str) -> Result<ProfileResponse, MarketDataError> {
        let text = self.fetch("/stock/profile2", &[("symbol", symbol)]).await?;

        serde_json::from_str(&text).map_err(|e| MarketDataError::Parse {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse profile response: {}", e),
        })
    }

    fn to_decimal(value: Option<f64>) -> Decimal {
        value
            .and_then(|v| Decimal::try_from(v).ok())
            .unwrap_or(Decimal::ZERO)
    }

    /// Finnhub reports market cap in millions.
    fn market_cap_from_millions(millions: Option<f64>) -> Decimal {
        Self::to_decimal(millions) * Decimal::from(1_000_000)
    }

    /// Join the quote and the (optional) profile into a normalized quote.
    fn build_quote(
        symbol: &str,
        quote: QuoteResponse,
        profile: Option<ProfileResponse>,
    ) -> Result<Quote, MarketDataError> {
        if let Some(error) = quote.error {
            return Err(MarketDataError::InvalidQuote {
                provider: PROVIDER_ID.to_string(),
                message: error,
            });
        }

        // Finnhub returns c = 0 for unknown symbols instead of an error
        let price = quote
            .c
            .filter(|c| *c != 0.0)
            .and_then(|c| Decimal::try_from(c).ok())
            .ok_or_else(|| MarketDataError::InvalidQuote {
                provider: PROVIDER_ID.to_string(),
                message: format!("No current price for symbol: {}", symbol),
            })?;

        let (name, market_cap) = match profile {
            Some(p) => (
                p.name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| symbol.to_string()),
                Self::market_cap_from_millions(p.market_capitalization),
            ),
            None => (symbol.to_string(), Decimal::ZERO),
        };

        let result = Quote {
            symbol: symbol.to_string(),
            name,
            price,
            change: Self::to_decimal(quote.d),
            change_percent: Self::to_decimal(quote.dp),
            volume: 0, // /quote endpoint doesn't provide volume
            high: Self::to_decimal(quote.h),
            low: Self::to_decimal(quote.l),
            market_cap,
        };

        Ok(result.with_consistent_sign())
    }
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_latest: true,
            supports_historical: false,
        }
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Finnhub", symbol);

        let (quote, profile) =
            futures::join!(self.fetch_quote(symbol), self.fetch_profile(symbol));

        let profile = match profile {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("Finnhub profile for {} unavailable: {}", symbol, e);
                None
            }
        };

        Self::build_quote(symbol, quote?, profile)
    }
}

// ============================================================================
// Tests
// ============================================================================
