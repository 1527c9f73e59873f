//! HTTP Integration Tests
//!
//! Drives tool calls through the real Alpaca adapters against a local mock
//! server: request shape, error classification and retry behavior.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use alpaca_mcp_server::application::ports::{MarketDataPort, TradingPort};
use alpaca_mcp_server::error::TradingErrorKind;
use alpaca_mcp_server::infrastructure::alpaca::{
    AlpacaConfig, AlpacaEnvironment, AlpacaMarketDataAdapter, AlpacaTradingAdapter, RetryConfig,
};
use alpaca_mcp_server::mcp::protocol::ToolsCallResult;
use alpaca_mcp_server::mcp::{Dispatcher, ToolContext, ToolRegistry};

// =============================================================================
// Harness
// =============================================================================

fn config(server: &MockServer, retry: RetryConfig) -> AlpacaConfig {
    AlpacaConfig::new(
        "PKTEST".to_string(),
        "secret".to_string(),
        AlpacaEnvironment::Paper,
    )
    .with_trading_url(server.uri())
    .with_data_url(server.uri())
    .with_timeout(Duration::from_secs(5))
    .with_retry(retry)
}

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(5),
        multiplier: 2.0,
    }
}

fn dispatcher_with(server: &MockServer, retry: RetryConfig) -> Dispatcher {
    let config = config(server, retry);
    let trading: Arc<dyn TradingPort> = Arc::new(AlpacaTradingAdapter::new(&config).unwrap());
    let market_data: Arc<dyn MarketDataPort> =
        Arc::new(AlpacaMarketDataAdapter::new(&config).unwrap());
    Dispatcher::new(
        ToolRegistry::with_all_tools(),
        ToolContext::new(trading, market_data),
    )
}

fn dispatcher(server: &MockServer) -> Dispatcher {
    dispatcher_with(server, RetryConfig::none())
}

fn payload(result: &ToolsCallResult) -> Value {
    serde_json::from_str(result.first_text().unwrap()).unwrap()
}

fn error_of(result: &ToolsCallResult) -> Value {
    assert!(result.is_error(), "expected error result, got {result:?}");
    payload(result)["error"].clone()
}

fn account_json() -> Value {
    json!({
        "id": "904837e3-3b76-47ec-b432-046db621571b",
        "account_number": "PA3W1TXSNR1V",
        "status": "ACTIVE",
        "currency": "USD",
        "cash": "10000.00",
        "buying_power": "40000.00",
        "equity": "12500.50",
        "portfolio_value": "12500.50",
        "pattern_day_trader": false,
        "trading_blocked": false,
        "transfers_blocked": false,
        "account_blocked": false,
        "shorting_enabled": true
    })
}

fn order_json(symbol: &str, status: &str) -> Value {
    json!({
        "id": "61e69015-8549-4bfd-b9c3-01e75843f47d",
        "client_order_id": "mcp_test",
        "symbol": symbol,
        "asset_class": "us_equity",
        "side": "buy",
        "type": "market",
        "order_class": "",
        "time_in_force": "day",
        "status": status,
        "qty": "1",
        "filled_qty": "0",
        "extended_hours": false,
        "created_at": "2024-06-14T14:59:58Z"
    })
}

fn bar_json(t: &str, close: &str) -> Value {
    json!({"t": t, "o": "189.0", "h": "191.0", "l": "188.5", "c": close, "v": 120_000, "n": 1500, "vw": "190.1"})
}

// =============================================================================
// Request shape
// =============================================================================

#[tokio::test]
async fn requests_carry_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account"))
        .and(header("APCA-API-KEY-ID", "PKTEST"))
        .and(header("APCA-API-SECRET-KEY", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json()))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher(&server).handle("get_account_info", None).await;

    assert!(!result.is_error());
    let account = payload(&result);
    assert_eq!(account["status"], "ACTIVE");
    assert_eq!(account["buying_power"], "40000.00");
}

#[tokio::test]
async fn stock_order_body_matches_broker_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/orders"))
        .and(body_partial_json(json!({
            "symbol": "AAPL",
            "qty": "2.5",
            "side": "buy",
            "type": "limit",
            "time_in_force": "gtc",
            "order_class": "simple",
            "limit_price": "150.25",
            "client_order_id": "my-order-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("AAPL", "accepted")))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher(&server)
        .handle(
            "place_stock_order",
            Some(json!({
                "symbol": "AAPL",
                "side": "buy",
                "qty": "2.5",
                "type": "limit",
                "time_in_force": "gtc",
                "limit_price": 150.25,
                "client_order_id": "my-order-1"
            })),
        )
        .await;

    assert!(!result.is_error(), "{result:?}");
    assert_eq!(payload(&result)["status"], "accepted");
}

#[tokio::test]
async fn invalid_order_never_reaches_broker() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("AAPL", "accepted")))
        .expect(0)
        .mount(&server)
        .await;

    let result = dispatcher(&server)
        .handle(
            "place_stock_order",
            Some(json!({"symbol": "AAPL", "side": "buy", "qty": 1, "type": "limit"})),
        )
        .await;

    let error = error_of(&result);
    assert_eq!(error["type"], "validation_error");
    assert_eq!(error["field"], "limit_price");
}

#[tokio::test]
async fn single_order_cancel_never_becomes_cancel_all() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    let dispatcher = dispatcher(&server);

    for order_id in [".", "..", "?", "%2e", "#frag"] {
        let result = dispatcher
            .handle("cancel_order_by_id", Some(json!({"order_id": order_id})))
            .await;
        let error = error_of(&result);
        assert_eq!(error["type"], "validation_error", "order_id {order_id:?}");
        assert_eq!(error["field"], "order_id");
    }
}

#[tokio::test]
async fn single_position_close_never_becomes_close_all() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result = dispatcher(&server)
        .handle("close_position", Some(json!({"symbol": "."})))
        .await;

    let error = error_of(&result);
    assert_eq!(error["type"], "validation_error");
    assert_eq!(error["field"], "symbol");
}

#[tokio::test]
async fn adapter_escapes_ids_into_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/orders/a%3Fb%23c"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v2/orders/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let adapter = AlpacaTradingAdapter::new(&config(&server, RetryConfig::none())).unwrap();

    adapter.cancel_order("a?b#c".to_string()).await.unwrap();

    let refused = adapter.cancel_order(".".to_string()).await.unwrap_err();
    assert_eq!(refused.kind, TradingErrorKind::Rejected);
    let refused = adapter.close_position("..".to_string(), None).await.unwrap_err();
    assert_eq!(refused.kind, TradingErrorKind::Rejected);
}

#[tokio::test]
async fn order_listing_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/orders"))
        .and(query_param("status", "open"))
        .and(query_param("limit", "25"))
        .and(query_param("nested", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([order_json("MSFT", "new")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher(&server)
        .handle("get_orders", Some(json!({"status": "open", "limit": 25})))
        .await;

    let orders = payload(&result);
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["symbol"], "MSFT");
}

#[tokio::test]
async fn bars_follow_page_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/stocks/AAPL/bars"))
        .and(query_param("timeframe", "1Day"))
        .and(query_param("start", "2024-06-03T00:00:00Z"))
        .and(query_param("end", "2024-06-07T00:00:00Z"))
        .and(query_param_is_missing("page_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bars": [bar_json("2024-06-03T04:00:00Z", "190.0")],
            "symbol": "AAPL",
            "next_page_token": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/stocks/AAPL/bars"))
        .and(query_param("page_token", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bars": [bar_json("2024-06-04T04:00:00Z", "191.0")],
            "symbol": "AAPL",
            "next_page_token": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher(&server)
        .handle(
            "get_stock_bars",
            Some(json!({"symbol": "AAPL", "start": "2024-06-03", "end": "2024-06-07"})),
        )
        .await;

    assert!(!result.is_error(), "{result:?}");
    let bars = payload(&result);
    let bars = bars.as_array().unwrap();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0]["close"], "190.0");
    assert_eq!(bars[1]["close"], "191.0");
}

// =============================================================================
// Error classification
// =============================================================================

#[tokio::test]
async fn unauthorized_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"code": 40110000, "message": "request is not authorized"})),
        )
        .mount(&server)
        .await;

    let result = dispatcher(&server).handle("get_account_info", None).await;

    let error = error_of(&result);
    assert_eq!(error["type"], "trading_error");
    assert_eq!(error["kind"], "auth_failure");
}

#[tokio::test]
async fn insufficient_buying_power_keeps_upstream_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/orders"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": 40310000,
            "message": "insufficient buying power"
        })))
        .mount(&server)
        .await;

    let result = dispatcher(&server)
        .handle(
            "place_stock_order",
            Some(json!({"symbol": "TSLA", "side": "buy", "qty": 1000})),
        )
        .await;

    let error = error_of(&result);
    assert_eq!(error["kind"], "insufficient_funds");
    assert_eq!(error["code"], "40310000");
    assert_eq!(error["message"], "insufficient buying power");
}

#[tokio::test]
async fn missing_position_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/positions/NVDA"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 40410000,
            "message": "position does not exist"
        })))
        .mount(&server)
        .await;

    let result = dispatcher(&server)
        .handle("get_open_position", Some(json!({"symbol": "NVDA"})))
        .await;

    assert_eq!(error_of(&result)["kind"], "not_found");
}

#[tokio::test]
async fn zero_size_close_gets_hint() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/positions/AAPL"))
        .and(query_param("qty", "0.0001"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 42210000,
            "message": "order would result in order size of zero"
        })))
        .mount(&server)
        .await;

    let result = dispatcher(&server)
        .handle("close_position", Some(json!({"symbol": "AAPL", "qty": 0.0001})))
        .await;

    let error = error_of(&result);
    assert_eq!(error["kind"], "rejected");
    assert_eq!(error["code"], "42210000");
    assert!(error["hint"].is_string());
}

// =============================================================================
// Retry
// =============================================================================

#[tokio::test]
async fn transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/clock"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/clock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timestamp": "2024-06-14T11:00:00-04:00",
            "is_open": true,
            "next_open": "2024-06-17T09:30:00-04:00",
            "next_close": "2024-06-14T16:00:00-04:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher_with(&server, fast_retry(3))
        .handle("get_market_clock", None)
        .await;

    assert!(!result.is_error(), "{result:?}");
    assert_eq!(payload(&result)["is_open"], true);
}

#[tokio::test]
async fn rate_limit_honors_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/positions"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher_with(&server, fast_retry(2))
        .handle("get_positions", None)
        .await;

    assert!(!result.is_error(), "{result:?}");
    assert_eq!(payload(&result), json!([]));
}

#[tokio::test]
async fn exhausted_retries_report_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let result = dispatcher_with(&server, fast_retry(2))
        .handle("get_account_info", None)
        .await;

    assert_eq!(error_of(&result)["kind"], "network");
}

#[tokio::test]
async fn rejections_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/orders/abc"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 42210000,
            "message": "order is already in \"filled\" state"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher_with(&server, fast_retry(3))
        .handle("cancel_order_by_id", Some(json!({"order_id": "abc"})))
        .await;

    assert_eq!(error_of(&result)["kind"], "rejected");
}

#[tokio::test]
async fn exhausted_rate_limit_keeps_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "0")
                .set_body_json(json!({"code": 42910000, "message": "rate limit exceeded"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let result = dispatcher_with(&server, fast_retry(2))
        .handle("get_account_info", None)
        .await;

    let error = error_of(&result);
    assert_eq!(error["kind"], "rate_limited");
    assert_eq!(error["message"], "rate limit exceeded");
    assert_eq!(error["code"], "42910000");
}
