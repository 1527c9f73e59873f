//! Stock market data DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Best bid and offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Quote time.
    pub timestamp: DateTime<Utc>,
    /// Bid price.
    pub bid_price: Decimal,
    /// Bid size.
    pub bid_size: Decimal,
    /// Bid exchange code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_exchange: Option<String>,
    /// Ask price.
    pub ask_price: Decimal,
    /// Ask size.
    pub ask_size: Decimal,
    /// Ask exchange code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_exchange: Option<String>,
    /// Quote conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    /// SIP tape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tape: Option<String>,
}

/// OHLCV bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Ticker symbol.
    pub symbol: String,
    /// Bar start time.
    pub timestamp: DateTime<Utc>,
    /// Open.
    pub open: Decimal,
    /// High.
    pub high: Decimal,
    /// Low.
    pub low: Decimal,
    /// Close.
    pub close: Decimal,
    /// Volume.
    pub volume: u64,
    /// Number of trades.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_count: Option<u64>,
    /// Volume-weighted average price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vwap: Option<Decimal>,
}

/// Single trade print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Ticker symbol.
    pub symbol: String,
    /// Trade time.
    pub timestamp: DateTime<Utc>,
    /// Price.
    pub price: Decimal,
    /// Size.
    pub size: Decimal,
    /// Exchange code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// Trade ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Trade conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    /// SIP tape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tape: Option<String>,
}

/// Latest trade, quote and bars for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSnapshot {
    /// Ticker symbol.
    pub symbol: String,
    /// Latest trade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_trade: Option<Trade>,
    /// Latest quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_quote: Option<Quote>,
    /// Current minute bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute_bar: Option<Bar>,
    /// Current daily bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_bar: Option<Bar>,
    /// Previous daily bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_daily_bar: Option<Bar>,
}
