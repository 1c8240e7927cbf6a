use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use financehub_core::{MarketDataClient, MarketSettings};
use financehub_market_data::{
    AlphaVantageProvider, CoinGeckoProvider, FinnhubProvider, MarketDataProvider,
};
use financehub_server::{api::app_router, config::Config, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Router over Alpha Vantage and CoinGecko mocks, with Finnhub unconfigured.
fn build_test_router(upstream: &MockServer) -> axum::Router {
    let equity: Vec<Arc<dyn MarketDataProvider>> = vec![
        Arc::new(AlphaVantageProvider::with_base_url(
            "test-key".to_string(),
            &upstream.uri(),
        )),
        Arc::new(FinnhubProvider::new(None)),
    ];
    let crypto = Arc::new(CoinGeckoProvider::with_base_url(&upstream.uri()));
    let client = MarketDataClient::with_providers(equity, crypto, Duration::from_secs(2));

    let state = AppState::from_client(client, MarketSettings::default());
    app_router(state, &Config::default())
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn mount_failing_upstream(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(server)
        .await;
}

#[tokio::test]
async fn health_lists_provider_chain() {
    let upstream = MockServer::start().await;
    let app = build_test_router(&upstream);

    let (status, body) = get_json(&app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["providers"],
        json!([
            { "id": "ALPHA_VANTAGE", "configured": true },
            { "id": "FINNHUB", "configured": false },
            { "id": "COINGECKO", "configured": true }
        ])
    );
}

#[tokio::test]
async fn quotes_are_live_then_cached() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "GLOBAL_QUOTE"))
        .and(query_param("symbol", "AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Global Quote": {
                "01. symbol": "AAPL",
                "03. high": "176.80",
                "04. low": "173.20",
                "05. price": "175.43",
                "06. volume": "45234567",
                "09. change": "2.15",
                "10. change percent": "1.2400%"
            }
        })))
        .mount(&upstream)
        .await;
    // Every other symbol is throttled
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Note": "API call frequency exceeded" })),
        )
        .mount(&upstream)
        .await;
    let app = build_test_router(&upstream);

    let (status, first) = get_json(&app, "/api/v1/market/quotes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["tier"], "live");
    assert_eq!(first["data"].as_array().unwrap().len(), 1);
    assert_eq!(first["data"][0]["symbol"], "AAPL");
    assert_eq!(first["data"][0]["changePercent"], 1.24);

    let (_, second) = get_json(&app, "/api/v1/market/quotes").await;
    assert_eq!(second["tier"], "cached");
    assert_eq!(second["asOf"], first["asOf"]);
}

#[tokio::test]
async fn failing_upstreams_serve_snapshots() {
    let upstream = MockServer::start().await;
    mount_failing_upstream(&upstream).await;
    let app = build_test_router(&upstream);

    let (_, quotes) = get_json(&app, "/api/v1/market/quotes").await;
    assert_eq!(quotes["tier"], "synthetic");
    assert_eq!(quotes["data"].as_array().unwrap().len(), 6);

    let (_, crypto) = get_json(&app, "/api/v1/market/crypto").await;
    assert_eq!(crypto["tier"], "synthetic");
    assert_eq!(crypto["data"][0]["id"], "bitcoin");
    assert_eq!(crypto["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn history_defaults_and_caps_days() {
    let upstream = MockServer::start().await;
    mount_failing_upstream(&upstream).await;
    let app = build_test_router(&upstream);

    let (status, default_days) = get_json(&app, "/api/v1/market/history/aapl").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(default_days["tier"], "synthetic");
    assert_eq!(default_days["data"].as_array().unwrap().len(), 31);

    let (_, capped) = get_json(&app, "/api/v1/market/history/AAPL?days=5000").await;
    assert_eq!(capped["data"].as_array().unwrap().len(), 366);
}

#[tokio::test]
async fn history_rejects_bad_input() {
    let upstream = MockServer::start().await;
    let app = build_test_router(&upstream);

    let (status, body) = get_json(&app, "/api/v1/market/history/AAPL?days=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = get_json(&app, "/api/v1/market/history/no%20spaces").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_matches_and_requires_query() {
    let upstream = MockServer::start().await;
    mount_failing_upstream(&upstream).await;
    let app = build_test_router(&upstream);

    let (status, found) = get_json(&app, "/api/v1/market/search?q=apple").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["data"][0]["symbol"], "AAPL");

    let (status, body) = get_json(&app, "/api/v1/market/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "query parameter 'q' is required");
}

#[tokio::test]
async fn summary_over_snapshot() {
    let upstream = MockServer::start().await;
    mount_failing_upstream(&upstream).await;
    let app = build_test_router(&upstream);

    let (status, body) = get_json(&app, "/api/v1/market/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["gainers"], 4);
    assert_eq!(body["data"]["losers"], 2);
    assert_eq!(body["data"]["topLoser"]["symbol"], "TSLA");
}
