use std::time::Duration;

use crate::quotes::constants::{
    CACHE_TTL, CRYPTO_MARKET_LIMIT, DEFAULT_HISTORY_DAYS, PROVIDER_TIMEOUT, WATCH_LIST,
};

/// Key used when no Alpha Vantage key is configured. Alpha Vantage answers
/// it for a few symbols and throttles the rest.
pub const ALPHA_VANTAGE_DEMO_KEY: &str = "demo";

/// Tunables of the market service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSettings {
    /// Equity symbols served by `get_quotes`, in display order
    pub watch_list: Vec<String>,
    pub cache_ttl: Duration,
    /// Upper bound on a single provider call
    pub provider_timeout: Duration,
    /// Number of assets requested from the crypto listing
    pub crypto_limit: u32,
    pub default_history_days: u32,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            watch_list: WATCH_LIST.iter().map(|s| s.to_string()).collect(),
            cache_ttl: CACHE_TTL,
            provider_timeout: PROVIDER_TIMEOUT,
            crypto_limit: CRYPTO_MARKET_LIMIT,
            default_history_days: DEFAULT_HISTORY_DAYS,
        }
    }
}

/// API keys for the equity providers.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderKeys {
    pub alpha_vantage: String,
    /// Finnhub is skipped when this is `None`
    pub finnhub: Option<String>,
}

impl ProviderKeys {
    /// Build keys from optional values. Blank values count as unset.
    pub fn new(alpha_vantage: Option<String>, finnhub: Option<String>) -> Self {
        Self {
            alpha_vantage: non_blank(alpha_vantage)
                .unwrap_or_else(|| ALPHA_VANTAGE_DEMO_KEY.to_string()),
            finnhub: non_blank(finnhub),
        }
    }

    pub fn uses_demo_key(&self) -> bool {
        self.alpha_vantage == ALPHA_VANTAGE_DEMO_KEY
    }
}

impl Default for ProviderKeys {
    fn default() -> Self {
        Self::new(None, None)
    }
}

// Keys stay out of logs
impl std::fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderKeys")
            .field("alpha_vantage", &if self.uses_demo_key() { "demo" } else { "***" })
            .field("finnhub", &self.finnhub.as_ref().map(|_| "***"))
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = MarketSettings::default();
        assert_eq!(settings.watch_list.len(), 8);
        assert_eq!(settings.watch_list[0], "AAPL");
        assert_eq!(settings.cache_ttl, Duration::from_secs(60));
        assert_eq!(settings.provider_timeout, Duration::from_secs(10));
        assert_eq!(settings.provider_timeout, financehub_market_data::DEFAULT_PROVIDER_TIMEOUT);
        assert_eq!(settings.crypto_limit, 10);
        assert_eq!(settings.default_history_days, 30);
    }

    #[test]
    fn test_missing_keys() {
        let keys = ProviderKeys::new(None, Some("   ".to_string()));
        assert_eq!(keys.alpha_vantage, "demo");
        assert!(keys.uses_demo_key());
        assert_eq!(keys.finnhub, None);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let keys = ProviderKeys::new(Some("secret-av".to_string()), Some("secret-fh".to_string()));
        let printed = format!("{:?}", keys);
        assert!(!printed.contains("secret"));
    }
}
