//! Fixtures shared by tool tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use super::context::ToolContext;
use super::dispatcher::Dispatcher;
use super::protocol::ToolsCallResult;
use super::registry::ToolRegistry;
use crate::application::dto::{Account, Order, Position, Quote};
use crate::application::ports::{MockMarketDataPort, MockTradingPort};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 15, 0, 0).unwrap()
}

pub fn dispatcher(trading: MockTradingPort, market_data: MockMarketDataPort) -> Dispatcher {
    let context =
        ToolContext::new(Arc::new(trading), Arc::new(market_data)).with_clock(fixed_now);
    Dispatcher::new(ToolRegistry::with_all_tools(), context)
}

pub fn trading_only(trading: MockTradingPort) -> Dispatcher {
    dispatcher(trading, MockMarketDataPort::new())
}

pub fn market_data_only(market_data: MockMarketDataPort) -> Dispatcher {
    dispatcher(MockTradingPort::new(), market_data)
}

pub fn text(result: &ToolsCallResult) -> Value {
    serde_json::from_str(result.first_text().unwrap()).unwrap()
}

pub fn error_body(result: &ToolsCallResult) -> Value {
    assert!(result.is_error(), "expected error, got {result:?}");
    text(result)["error"].clone()
}

pub fn order(symbol: &str, status: &str) -> Order {
    serde_json::from_value(json!({
        "id": "61e69015-8549-4bfd-b9c3-01e75843f47d",
        "client_order_id": "mcp_0b1e",
        "symbol": symbol,
        "asset_class": "us_equity",
        "side": "buy",
        "order_type": "market",
        "time_in_force": "day",
        "status": status,
        "qty": "1",
        "filled_qty": if status == "filled" { "1" } else { "0" },
        "extended_hours": false,
        "created_at": "2024-06-14T14:59:58Z"
    }))
    .unwrap()
}

pub fn position(symbol: &str) -> Position {
    serde_json::from_value(json!({
        "symbol": symbol,
        "asset_id": "b0b6dd9d-8b9b-48a9-ba46-b9d54906e415",
        "asset_class": "us_equity",
        "side": "long",
        "qty": "10",
        "avg_entry_price": "182.50",
        "cost_basis": "1825.00",
        "market_value": "1900.00",
        "current_price": "190.00"
    }))
    .unwrap()
}

pub fn account() -> Account {
    serde_json::from_value(json!({
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
    }))
    .unwrap()
}

pub fn quote(symbol: &str) -> Quote {
    serde_json::from_value(json!({
        "symbol": symbol,
        "timestamp": "2024-06-14T14:59:59Z",
        "bid_price": "189.95",
        "bid_size": "3",
        "ask_price": "190.05",
        "ask_size": "2"
    }))
    .unwrap()
}
