use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use financehub_core::quotes::constants::MAX_HISTORY_DAYS;
use financehub_core::{CryptoQuote, HistoricalPoint, MarketSummary, Quote, Sourced};
use serde::Deserialize;

const MAX_SYMBOL_LEN: usize = 12;

#[derive(Deserialize)]
struct HistoryParams {
    days: Option<u32>,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn get_quotes(State(state): State<Arc<AppState>>) -> Json<Sourced<Vec<Quote>>> {
    Json(state.market_service.get_quotes().await)
}

async fn get_crypto(State(state): State<Arc<AppState>>) -> Json<Sourced<Vec<CryptoQuote>>> {
    Json(state.market_service.get_crypto().await)
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> ApiResult<Json<Sourced<Vec<HistoricalPoint>>>> {
    let Query(params) = params?;
    let symbol = validate_symbol(&symbol)?;
    let days = params
        .days
        .unwrap_or(state.market_service.settings().default_history_days)
        .min(MAX_HISTORY_DAYS);

    Ok(Json(
        state.market_service.get_historical(&symbol, days).await,
    ))
}

async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Sourced<Vec<Quote>>>> {
    let Query(params) = params?;
    let query = params
        .q
        .ok_or_else(|| ApiError::BadRequest("query parameter 'q' is required".to_string()))?;

    Ok(Json(state.market_service.search(&query).await))
}

async fn get_summary(State(state): State<Arc<AppState>>) -> Json<Sourced<Option<MarketSummary>>> {
    Json(state.market_service.market_summary().await)
}

fn validate_symbol(raw: &str) -> ApiResult<String> {
    let symbol = raw.trim();
    let valid = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if valid {
        Ok(symbol.to_uppercase())
    } else {
        Err(ApiError::BadRequest(format!("invalid symbol: {}", raw)))
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/market/quotes", get(get_quotes))
        .route("/market/crypto", get(get_crypto))
        .route("/market/history/{symbol}", get(get_history))
        .route("/market/search", get(search))
        .route("/market/summary", get(get_summary))
}
