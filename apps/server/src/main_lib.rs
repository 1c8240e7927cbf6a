use std::sync::Arc;

use crate::config::Config;
use financehub_core::{
    MarketDataClient, MarketService, MarketServiceTrait, MarketSettings, ProviderKeys,
};
use serde::Serialize;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Registration state of one upstream provider, as reported by `/health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub id: String,
    pub configured: bool,
}

pub struct AppState {
    pub market_service: Arc<dyn MarketServiceTrait>,
    /// Equity providers in fallback order, then the crypto provider
    pub providers: Vec<ProviderStatus>,
}

impl AppState {
    /// State over an existing client, e.g. one backed by mock upstreams.
    pub fn from_client(client: MarketDataClient, settings: MarketSettings) -> Arc<Self> {
        let mut providers: Vec<ProviderStatus> = client
            .providers()
            .into_iter()
            .map(|(id, configured)| ProviderStatus {
                id: id.to_string(),
                configured,
            })
            .collect();
        providers.push(ProviderStatus {
            id: client.crypto_provider_id().to_string(),
            configured: true,
        });

        Arc::new(Self {
            market_service: Arc::new(MarketService::new(client, settings)),
            providers,
        })
    }
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `init` also bridges `log` records from the library crates
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let keys = ProviderKeys::new(
        config.alpha_vantage_api_key.clone(),
        config.finnhub_api_key.clone(),
    );
    tracing::info!("Provider keys: {:?}", keys);

    let settings = MarketSettings {
        provider_timeout: config.provider_timeout,
        ..MarketSettings::default()
    };
    let client = MarketDataClient::new(&keys, settings.provider_timeout);

    let state = AppState::from_client(client, settings);
    for provider in &state.providers {
        tracing::info!(
            "Market data provider {} (configured: {})",
            provider.id,
            provider.configured
        );
    }
    Ok(state)
}
