//! Background scheduler for periodic market refresh.
//!
//! Keeps the quote and crypto cache entries warm so requests rarely wait on
//! upstream providers.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use financehub_core::DataTier;

use crate::main_lib::AppState;

/// Starts the background refresh scheduler. The first refresh runs at once.
pub fn start_market_refresh_scheduler(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Market refresh scheduler started ({:?} interval)", every);

        let mut refresh_interval = interval(every);
        refresh_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            refresh_interval.tick().await;
            run_scheduled_refresh(&state).await;
        }
    })
}

/// Runs a single refresh cycle.
async fn run_scheduled_refresh(state: &Arc<AppState>) {
    debug!("Running scheduled market refresh...");

    let (quotes, crypto) = state.market_service.refresh().await;

    if quotes == DataTier::Synthetic || crypto == DataTier::Synthetic {
        warn!(
            "Scheduled refresh fell back to synthetic data (quotes: {:?}, crypto: {:?})",
            quotes, crypto
        );
    } else {
        debug!(
            "Scheduled refresh done (quotes: {:?}, crypto: {:?})",
            quotes, crypto
        );
    }
}
