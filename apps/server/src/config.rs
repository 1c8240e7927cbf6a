use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use financehub_core::quotes::constants::PROVIDER_TIMEOUT;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8088";
const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub alpha_vantage_api_key: Option<String>,
    pub finnhub_api_key: Option<String>,
    pub refresh_interval: Duration,
    pub provider_timeout: Duration,
    pub cors_allow: Vec<String>,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8088)),
            alpha_vantage_api_key: None,
            finnhub_api_key: None,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            provider_timeout: PROVIDER_TIMEOUT,
            cors_allow: vec!["*".to_string()],
            log_format: "text".to_string(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment, after loading `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let listen_addr: SocketAddr = get("FH_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("Invalid FH_LISTEN_ADDR")?;

        let refresh_secs = parse_secs(get("FH_REFRESH_INTERVAL_SECS"), DEFAULT_REFRESH_SECS)
            .context("Invalid FH_REFRESH_INTERVAL_SECS")?;
        let timeout_secs = parse_secs(get("FH_PROVIDER_TIMEOUT_SECS"), PROVIDER_TIMEOUT.as_secs())
            .context("Invalid FH_PROVIDER_TIMEOUT_SECS")?;

        let cors_allow = get("FH_CORS_ALLOW_ORIGIN")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            listen_addr,
            alpha_vantage_api_key: get("ALPHA_VANTAGE_API_KEY"),
            finnhub_api_key: get("FINNHUB_API_KEY"),
            refresh_interval: Duration::from_secs(refresh_secs),
            provider_timeout: Duration::from_secs(timeout_secs),
            cors_allow,
            log_format: get("FH_LOG_FORMAT").unwrap_or_else(|| "text".into()),
        })
    }
}

fn parse_secs(value: Option<String>, default: u64) -> anyhow::Result<u64> {
    match value {
        None => Ok(default),
        Some(v) => {
            let secs: u64 = v.parse()?;
            anyhow::ensure!(secs > 0, "must be greater than zero");
            Ok(secs)
        }
    }
}
