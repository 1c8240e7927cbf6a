//! Provider registry for orchestrating equity market data providers.
//!
//! The registry manages multiple providers, handling:
//! - Provider ordering by priority
//! - Skipping providers that are unconfigured or lack the capability
//! - Bounding every provider call with a timeout
//! - Fallback to the next provider on failure

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use super::{FetchDiagnostics, SkipReason};
use crate::errors::MarketDataError;
use crate::models::{HistoricalPoint, ProviderId, Quote};
use crate::provider::MarketDataProvider;

/// Default bound on a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Run `call` for `provider_id`, turning an elapsed `timeout` into a
/// `Network` error so it falls back like any other transport failure.
pub async fn call_with_timeout<T, Fut>(
    provider_id: &str,
    timeout: Duration,
    call: Fut,
) -> Result<T, MarketDataError>
where
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(MarketDataError::Network {
            provider: provider_id.to_string(),
            message: format!("no response within {:?}", timeout),
        }),
    }
}

/// Provider registry for orchestrating market data fetching.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MarketDataProvider>>,
    timeout: Duration,
}

impl ProviderRegistry {
    /// Create a new provider registry. Providers are kept ordered by priority.
    pub fn new(mut providers: Vec<Arc<dyn MarketDataProvider>>, timeout: Duration) -> Self {
        // Stable sort keeps registration order among equal priorities
        providers.sort_by_key(|p| p.priority());
        Self { providers, timeout }
    }

    /// Fetch the latest quote for a symbol.
    ///
    /// Tries providers in priority order; the first success wins.
    pub async fn fetch_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let (result, diagnostics) = self.fetch_latest_quote_with_diagnostics(symbol).await;
        debug!("Latest quote for {}: {}", symbol, diagnostics.summary());
        result
    }

    /// Same as [`fetch_latest_quote`](Self::fetch_latest_quote), also
    /// returning the per-provider trail.
    pub async fn fetch_latest_quote_with_diagnostics(
        &self,
        symbol: &str,
    ) -> (Result<Quote, MarketDataError>, FetchDiagnostics) {
        let mut diagnostics = FetchDiagnostics::new();
        let mut last_error: Option<MarketDataError> = None;

        for provider in &self.providers {
            let provider_id: ProviderId = Cow::Borrowed(provider.id());

            if !provider.is_configured() {
                debug!("Provider '{}' is not configured, skipping", provider_id);
                diagnostics.record_skip(provider_id, SkipReason::NotConfigured);
                continue;
            }

            if !provider.capabilities().supports_latest {
                diagnostics.record_skip(provider_id, SkipReason::LatestNotSupported);
                continue;
            }

            let outcome = call_with_timeout(
                provider.id(),
                self.timeout,
                provider.get_latest_quote(symbol),
            )
            .await;

            match outcome {
                Ok(quote) => {
                    diagnostics.record_success(provider_id);
                    return (Ok(quote), diagnostics);
                }
                Err(e) => {
                    Self::log_failure(&provider_id, symbol, &e);
                    diagnostics.record_error(provider_id, e.to_string());
                    last_error = Some(e);
                }
            }
        }

        (Err(Self::final_error(last_error, &diagnostics)), diagnostics)
    }

    /// Fetch the newest `days` daily closes for a symbol.
    pub async fn fetch_historical(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<HistoricalPoint>, MarketDataError> {
        let mut diagnostics = FetchDiagnostics::new();
        let mut last_error: Option<MarketDataError> = None;

        for provider in &self.providers {
            let provider_id: ProviderId = Cow::Borrowed(provider.id());

            if !provider.is_configured() {
                diagnostics.record_skip(provider_id, SkipReason::NotConfigured);
                continue;
            }

            if !provider.capabilities().supports_historical {
                diagnostics.record_skip(provider_id, SkipReason::HistoricalNotSupported);
                continue;
            }

            let outcome = call_with_timeout(
                provider.id(),
                self.timeout,
                provider.get_historical(symbol, days),
            )
            .await;

            match outcome {
                Ok(series) => {
                    info!(
                        "Fetched {} daily closes for {} from '{}'",
                        series.len(),
                        symbol,
                        provider_id
                    );
                    diagnostics.record_success(provider_id);
                    debug!("Historical for {}: {}", symbol, diagnostics.summary());
                    return Ok(series);
                }
                Err(e) => {
                    Self::log_failure(&provider_id, symbol, &e);
                    diagnostics.record_error(provider_id, e.to_string());
                    last_error = Some(e);
                }
            }
        }

        debug!("Historical for {}: {}", symbol, diagnostics.summary());
        Err(Self::final_error(last_error, &diagnostics))
    }

    /// Get the list of registered providers, in priority order.
    pub fn providers(&self) -> &[Arc<dyn MarketDataProvider>] {
        &self.providers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn log_failure(provider_id: &ProviderId, symbol: &str, error: &MarketDataError) {
        if error.is_transient() {
            warn!(
                "Provider '{}' failed for {}: {}, trying next provider",
                provider_id, symbol, error
            );
        } else {
            info!(
                "Provider '{}' has nothing for {}: {}, trying next provider",
                provider_id, symbol, error
            );
        }
    }

    fn final_error(
        last_error: Option<MarketDataError>,
        diagnostics: &FetchDiagnostics,
    ) -> MarketDataError {
        match last_error {
            _ if diagnostics.attempted_count() == 0 => MarketDataError::NoProvidersAvailable,
            Some(e) if diagnostics.attempted_count() == 1 => e,
            _ => MarketDataError::AllProvidersFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderCapabilities;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Succeed,
        Fail,
        Hang,
    }

    struct MockProvider {
        id: &'static str,
        priority: u8,
        configured: bool,
        historical: bool,
        behavior: Behavior,
        call_count: AtomicUsize,
    }

    impl MockProvider {
        fn new(id: &'static str, priority: u8, behavior: Behavior) -> Self {
            Self {
                id,
                priority,
                configured: true,
                historical: true,
                behavior,
                call_count: AtomicUsize::new(0),
            }
        }

        fn unconfigured(mut self) -> Self {
            self.configured = false;
            self
        }

        fn latest_only(mut self) -> Self {
            self.historical = false;
            self
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        async fn respond<T>(&self, value: T) -> Result<T, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => Ok(value),
                Behavior::Fail => Err(MarketDataError::RateLimited {
                    provider: self.id.to_string(),
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(value)
                }
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities {
                supports_latest: true,
                supports_historical: self.historical,
            }
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
            self.respond(Quote {
                symbol: symbol.to_string(),
                name: self.id.to_string(),
                price: dec!(102),
                change: dec!(2),
                change_percent: dec!(2),
                volume: 1000,
                high: dec!(105),
                low: dec!(95),
                market_cap: dec!(0),
            })
            .await
        }

        async fn get_historical(
            &self,
            _symbol: &str,
            _days: u32,
        ) -> Result<Vec<HistoricalPoint>, MarketDataError> {
            let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
            self.respond(vec![HistoricalPoint::new(date, dec!(102), None)])
                .await
        }
    }

    fn registry(providers: Vec<Arc<MockProvider>>) -> ProviderRegistry {
        let providers = providers
            .into_iter()
            .map(|p| p as Arc<dyn MarketDataProvider>)
            .collect();
        ProviderRegistry::new(providers, Duration::from_millis(200))
    }

    #[test]
    fn test_provider_ordering_by_priority() {
        let registry = registry(vec![
            Arc::new(MockProvider::new("LOW_PRIORITY", 20, Behavior::Succeed)),
            Arc::new(MockProvider::new("HIGH_PRIORITY", 5, Behavior::Succeed)),
            Arc::new(MockProvider::new("MED_PRIORITY", 10, Behavior::Succeed)),
        ]);

        let ids: Vec<_> = registry.providers().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["HIGH_PRIORITY", "MED_PRIORITY", "LOW_PRIORITY"]);
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let primary = Arc::new(MockProvider::new("PRIMARY", 1, Behavior::Succeed));
        let backup = Arc::new(MockProvider::new("BACKUP", 2, Behavior::Succeed));
        let registry = registry(vec![backup.clone(), primary.clone()]);

        let quote = registry.fetch_latest_quote("AAPL").await.unwrap();

        assert_eq!(quote.name, "PRIMARY");
        assert_eq!(primary.calls(), 1);
        assert_eq!(backup.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_on_failure() {
        let primary = Arc::new(MockProvider::new("PRIMARY", 1, Behavior::Fail));
        let backup = Arc::new(MockProvider::new("BACKUP", 2, Behavior::Succeed));
        let registry = registry(vec![primary.clone(), backup.clone()]);

        let (result, diagnostics) = registry.fetch_latest_quote_with_diagnostics("AAPL").await;

        assert_eq!(result.unwrap().name, "BACKUP");
        assert_eq!(
            diagnostics.summary(),
            "PRIMARY: ERROR (Rate limited: PRIMARY) -> BACKUP: SUCCESS"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_skipped() {
        let primary = Arc::new(MockProvider::new("PRIMARY", 1, Behavior::Fail));
        let backup = Arc::new(MockProvider::new("BACKUP", 2, Behavior::Succeed).unconfigured());
        let registry = registry(vec![primary, backup.clone()]);

        let (result, diagnostics) = registry.fetch_latest_quote_with_diagnostics("AAPL").await;

        // Single real attempt, so its own error surfaces
        assert!(matches!(result, Err(MarketDataError::RateLimited { .. })));
        assert_eq!(backup.calls(), 0);
        assert_eq!(
            diagnostics.skip_reasons(),
            vec![(&Cow::Borrowed("BACKUP"), &SkipReason::NotConfigured)]
        );
    }

    #[tokio::test]
    async fn test_all_failed() {
        let registry = registry(vec![
            Arc::new(MockProvider::new("A", 1, Behavior::Fail)),
            Arc::new(MockProvider::new("B", 2, Behavior::Fail)),
        ]);

        let err = registry.fetch_latest_quote("AAPL").await.unwrap_err();
        assert_eq!(err, MarketDataError::AllProvidersFailed);
    }

    #[tokio::test]
    async fn test_no_providers_available() {
        let empty = registry(vec![]);
        assert_eq!(
            empty.fetch_latest_quote("AAPL").await.unwrap_err(),
            MarketDataError::NoProvidersAvailable
        );

        let only_unconfigured = registry(vec![Arc::new(
            MockProvider::new("A", 1, Behavior::Succeed).unconfigured(),
        )]);
        assert_eq!(
            only_unconfigured.fetch_latest_quote("AAPL").await.unwrap_err(),
            MarketDataError::NoProvidersAvailable
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out_and_falls_back() {
        let slow = Arc::new(MockProvider::new("SLOW", 1, Behavior::Hang));
        let backup = Arc::new(MockProvider::new("BACKUP", 2, Behavior::Succeed));
        let registry = registry(vec![slow.clone(), backup]);

        let (result, diagnostics) = registry.fetch_latest_quote_with_diagnostics("AAPL").await;

        assert_eq!(result.unwrap().name, "BACKUP");
        assert_eq!(slow.calls(), 1);
        let errors = diagnostics.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].1.starts_with("Network error from SLOW"));
    }

    #[tokio::test]
    async fn test_historical_skips_latest_only_providers() {
        let latest_only = Arc::new(MockProvider::new("LATEST", 1, Behavior::Succeed).latest_only());
        let full = Arc::new(MockProvider::new("FULL", 2, Behavior::Succeed));
        let registry = registry(vec![latest_only.clone(), full.clone()]);

        let series = registry.fetch_historical("AAPL", 30).await.unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(latest_only.calls(), 0);
        assert_eq!(full.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_with_timeout_maps_to_network() {
        let err = call_with_timeout::<(), _>("SLOW", Duration::from_secs(1), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, MarketDataError::Network { .. }));
        assert_eq!(err.provider(), Some("SLOW"));
    }
}
