//! Alpaca API request and response types.
//!
//! These types map directly to Alpaca's REST API format. Anything whose wire
//! shape already matches a DTO (account, positions, clock, calendar,
//! announcements) is deserialized straight into the DTO instead.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::dto::{
    Asset, Bar, CancelResult, ClosePositionResult, Greeks, OptionContract, OptionQuote,
    OptionSnapshot, OptionTrade, Order, Quote, StockSnapshot, Trade, Watchlist,
};
use crate::application::ports::{OrderRequest, OrderTarget};

// ============================================================================
// Error Types
// ============================================================================

/// Error body returned by both APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaErrorResponse {
    /// Error code, numeric on the trading API and sometimes absent.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    /// Error message.
    #[serde(default)]
    pub message: String,
}

impl AlpacaErrorResponse {
    /// Error code as a string.
    pub fn code_string(&self) -> Option<String> {
        match self.code.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ============================================================================
// Order Request Types
// ============================================================================

/// One leg of a multi-leg order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlpacaLegRequest {
    /// OCC contract symbol.
    pub symbol: String,
    /// Leg side.
    pub side: String,
    /// Leg ratio.
    pub ratio_qty: String,
}

/// Order request for Alpaca API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlpacaOrderRequest {
    /// Symbol, absent for multi-leg orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Quantity.
    pub qty: String,
    /// Side, absent for multi-leg orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: String,
    /// Time in force.
    pub time_in_force: String,
    /// Order class.
    pub order_class: String,
    /// Limit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<String>,
    /// Stop price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<String>,
    /// Trailing offset in dollars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail_price: Option<String>,
    /// Trailing offset in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail_percent: Option<String>,
    /// Extended hours trading.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub extended_hours: bool,
    /// Client order ID.
    pub client_order_id: String,
    /// Multi-leg legs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub legs: Vec<AlpacaLegRequest>,
}

impl From<&OrderRequest> for AlpacaOrderRequest {
    fn from(request: &OrderRequest) -> Self {
        let (symbol, side, legs) = match &request.target {
            OrderTarget::Single { symbol, side } => {
                (Some(symbol.clone()), Some(side.as_str().to_string()), Vec::new())
            }
            OrderTarget::MultiLeg(legs) => (
                None,
                None,
                legs.iter()
                    .map(|leg| AlpacaLegRequest {
                        symbol: leg.symbol.clone(),
                        side: leg.side.as_str().to_string(),
                        ratio_qty: leg.ratio_qty.to_string(),
                    })
                    .collect(),
            ),
        };
        let prices = request.prices;

        Self {
            symbol,
            qty: request.qty.normalize().to_string(),
            side,
            order_type: request.order_type.as_str().to_string(),
            time_in_force: request.time_in_force.as_str().to_string(),
            order_class: request.order_class.as_str().to_string(),
            limit_price: prices.limit_price.map(|p| p.to_string()),
            stop_price: prices.stop_price.map(|p| p.to_string()),
            trail_price: prices.trail_price.map(|p| p.to_string()),
            trail_percent: prices.trail_percent.map(|p| p.to_string()),
            extended_hours: request.extended_hours,
            client_order_id: request.client_order_id.clone(),
            legs,
        }
    }
}

// ============================================================================
// Order Response Types
// ============================================================================

/// Order response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaOrderResponse {
    pub id: String,
    pub client_order_id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub asset_class: Option<String>,
    #[serde(default)]
    pub side: String,
    #[serde(rename = "type", default)]
    pub order_type: String,
    #[serde(default)]
    pub order_class: Option<String>,
    pub time_in_force: String,
    pub status: String,
    #[serde(default)]
    pub qty: Option<Decimal>,
    #[serde(default)]
    pub notional: Option<Decimal>,
    #[serde(default)]
    pub filled_qty: Decimal,
    #[serde(default)]
    pub filled_avg_price: Option<Decimal>,
    #[serde(default)]
    pub limit_price: Option<Decimal>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub trail_price: Option<Decimal>,
    #[serde(default)]
    pub trail_percent: Option<Decimal>,
    #[serde(default)]
    pub ratio_qty: Option<Decimal>,
    #[serde(default)]
    pub extended_hours: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub filled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expired_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub legs: Option<Vec<AlpacaOrderResponse>>,
}

impl From<AlpacaOrderResponse> for Order {
    fn from(resp: AlpacaOrderResponse) -> Self {
        Self {
            id: resp.id,
            client_order_id: resp.client_order_id,
            symbol: resp.symbol,
            asset_class: resp.asset_class,
            side: resp.side,
            order_type: resp.order_type,
            order_class: resp.order_class.filter(|c| !c.is_empty()),
            time_in_force: resp.time_in_force,
            status: resp.status,
            qty: resp.qty,
            notional: resp.notional,
            filled_qty: resp.filled_qty,
            filled_avg_price: resp.filled_avg_price,
            limit_price: resp.limit_price,
            stop_price: resp.stop_price,
            trail_price: resp.trail_price,
            trail_percent: resp.trail_percent,
            ratio_qty: resp.ratio_qty,
            extended_hours: resp.extended_hours,
            created_at: resp.created_at,
            updated_at: resp.updated_at,
            submitted_at: resp.submitted_at,
            filled_at: resp.filled_at,
            canceled_at: resp.canceled_at,
            expired_at: resp.expired_at,
            failed_at: resp.failed_at,
            legs: resp
                .legs
                .unwrap_or_default()
                .into_iter()
                .map(Self::from)
                .collect(),
        }
    }
}

/// One entry of the multi-status body returned by `DELETE /v2/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaCancelStatus {
    pub id: String,
    pub status: u16,
}

impl From<AlpacaCancelStatus> for CancelResult {
    fn from(status: AlpacaCancelStatus) -> Self {
        Self {
            order_id: status.id,
            status: status.status,
        }
    }
}

/// One entry of the multi-status body returned by `DELETE /v2/positions`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaCloseStatus {
    pub symbol: String,
    pub status: u16,
    /// Order on success, error body otherwise.
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

impl From<AlpacaCloseStatus> for ClosePositionResult {
    fn from(entry: AlpacaCloseStatus) -> Self {
        let body = entry.body.unwrap_or_default();
        let field = |name: &str| {
            body.get(name)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };
        let success = (200..300).contains(&entry.status);

        Self {
            symbol: entry.symbol,
            status: entry.status,
            order_id: if success { field("id") } else { None },
            message: if success { None } else { field("message") },
        }
    }
}

// ============================================================================
// Asset, Watchlist and Option Contract Types
// ============================================================================

/// Asset response. Alpaca names the asset class `class`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaAsset {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "class")]
    pub asset_class: String,
    pub exchange: String,
    pub status: String,
    #[serde(default)]
    pub tradable: bool,
    #[serde(default)]
    pub marginable: bool,
    #[serde(default)]
    pub shortable: bool,
    #[serde(default)]
    pub easy_to_borrow: bool,
    #[serde(default)]
    pub fractionable: bool,
    #[serde(default)]
    pub attributes: Option<Vec<String>>,
}

impl From<AlpacaAsset> for Asset {
    fn from(asset: AlpacaAsset) -> Self {
        Self {
            id: asset.id,
            symbol: asset.symbol,
            name: asset.name.filter(|n| !n.is_empty()),
            asset_class: asset.asset_class,
            exchange: asset.exchange,
            status: asset.status,
            tradable: asset.tradable,
            marginable: asset.marginable,
            shortable: asset.shortable,
            easy_to_borrow: asset.easy_to_borrow,
            fractionable: asset.fractionable,
            attributes: asset.attributes.unwrap_or_default(),
        }
    }
}

/// Watchlist request body for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlpacaWatchlistRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,
}

/// Watchlist response. The list endpoint omits `assets`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaWatchlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub assets: Option<Vec<AlpacaAsset>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<AlpacaWatchlist> for Watchlist {
    fn from(list: AlpacaWatchlist) -> Self {
        Self {
            id: list.id,
            name: list.name,
            symbols: list
                .assets
                .unwrap_or_default()
                .into_iter()
                .map(|a| a.symbol)
                .collect(),
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

/// Option contract response. Alpaca names the contract type `type`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaOptionContract {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub tradable: bool,
    pub expiration_date: NaiveDate,
    pub root_symbol: String,
    pub underlying_symbol: String,
    #[serde(rename = "type")]
    pub contract_type: String,
    pub style: String,
    pub strike_price: Decimal,
    pub size: Decimal,
    #[serde(default)]
    pub open_interest: Option<Decimal>,
    #[serde(default)]
    pub open_interest_date: Option<NaiveDate>,
    #[serde(default)]
    pub close_price: Option<Decimal>,
    #[serde(default)]
    pub close_price_date: Option<NaiveDate>,
}

impl From<AlpacaOptionContract> for OptionContract {
    fn from(c: AlpacaOptionContract) -> Self {
        Self {
            id: c.id,
            symbol: c.symbol,
            name: c.name,
            status: c.status,
            tradable: c.tradable,
            expiration_date: c.expiration_date,
            root_symbol: c.root_symbol,
            underlying_symbol: c.underlying_symbol,
            contract_type: c.contract_type,
            style: c.style,
            strike_price: c.strike_price,
            size: c.size,
            open_interest: c.open_interest,
            open_interest_date: c.open_interest_date,
            close_price: c.close_price,
            close_price_date: c.close_price_date,
        }
    }
}

/// Page of option contracts.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaOptionContractsPage {
    #[serde(default)]
    pub option_contracts: Vec<AlpacaOptionContract>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

// ============================================================================
// Market Data Types
// ============================================================================

/// Stock quote in data API short form.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaQuote {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "bp")]
    pub bid_price: Decimal,
    #[serde(rename = "bs")]
    pub bid_size: Decimal,
    #[serde(rename = "bx", default)]
    pub bid_exchange: Option<String>,
    #[serde(rename = "ap")]
    pub ask_price: Decimal,
    #[serde(rename = "as")]
    pub ask_size: Decimal,
    #[serde(rename = "ax", default)]
    pub ask_exchange: Option<String>,
    #[serde(rename = "c", default)]
    pub conditions: Option<Vec<String>>,
    #[serde(rename = "z", default)]
    pub tape: Option<String>,
}

impl AlpacaQuote {
    pub fn into_quote(self, symbol: &str) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            timestamp: self.timestamp,
            bid_price: self.bid_price,
            bid_size: self.bid_size,
            bid_exchange: self.bid_exchange,
            ask_price: self.ask_price,
            ask_size: self.ask_size,
            ask_exchange: self.ask_exchange,
            conditions: self.conditions.unwrap_or_default(),
            tape: self.tape,
        }
    }
}

/// Bar in data API short form.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    pub open: Decimal,
    #[serde(rename = "h")]
    pub high: Decimal,
    #[serde(rename = "l")]
    pub low: Decimal,
    #[serde(rename = "c")]
    pub close: Decimal,
    #[serde(rename = "v")]
    pub volume: u64,
    #[serde(rename = "n", default)]
    pub trade_count: Option<u64>,
    #[serde(rename = "vw", default)]
    pub vwap: Option<Decimal>,
}

impl AlpacaBar {
    pub fn into_bar(self, symbol: &str) -> Bar {
        Bar {
            symbol: symbol.to_string(),
            timestamp: self.timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            trade_count: self.trade_count,
            vwap: self.vwap,
        }
    }
}

/// Stock trade in data API short form.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaTrade {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "s")]
    pub size: Decimal,
    #[serde(rename = "x", default)]
    pub exchange: Option<String>,
    #[serde(rename = "i", default)]
    pub id: Option<u64>,
    #[serde(rename = "c", default)]
    pub conditions: Option<Vec<String>>,
    #[serde(rename = "z", default)]
    pub tape: Option<String>,
}

impl AlpacaTrade {
    pub fn into_trade(self, symbol: &str) -> Trade {
        Trade {
            symbol: symbol.to_string(),
            timestamp: self.timestamp,
            price: self.price,
            size: self.size,
            exchange: self.exchange,
            id: self.id,
            conditions: self.conditions.unwrap_or_default(),
            tape: self.tape,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestQuoteResponse {
    pub quote: AlpacaQuote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestTradeResponse {
    pub trade: AlpacaTrade,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestBarResponse {
    pub bar: AlpacaBar,
}

/// Page of historical bars.
#[derive(Debug, Clone, Deserialize)]
pub struct BarsPage {
    #[serde(default)]
    pub bars: Option<Vec<AlpacaBar>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Page of historical trades.
#[derive(Debug, Clone, Deserialize)]
pub struct TradesPage {
    #[serde(default)]
    pub trades: Option<Vec<AlpacaTrade>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Stock snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlpacaSnapshot {
    #[serde(default)]
    pub latest_trade: Option<AlpacaTrade>,
    #[serde(default)]
    pub latest_quote: Option<AlpacaQuote>,
    #[serde(default)]
    pub minute_bar: Option<AlpacaBar>,
    #[serde(default)]
    pub daily_bar: Option<AlpacaBar>,
    #[serde(default)]
    pub prev_daily_bar: Option<AlpacaBar>,
}

impl AlpacaSnapshot {
    pub fn into_snapshot(self, symbol: &str) -> StockSnapshot {
        StockSnapshot {
            symbol: symbol.to_string(),
            latest_trade: self.latest_trade.map(|t| t.into_trade(symbol)),
            latest_quote: self.latest_quote.map(|q| q.into_quote(symbol)),
            minute_bar: self.minute_bar.map(|b| b.into_bar(symbol)),
            daily_bar: self.daily_bar.map(|b| b.into_bar(symbol)),
            prev_daily_bar: self.prev_daily_bar.map(|b| b.into_bar(symbol)),
        }
    }
}

/// `GET /v2/stocks/snapshots` body: symbol to snapshot, `null` for unknown symbols.
pub type SnapshotsResponse = BTreeMap<String, Option<AlpacaSnapshot>>;

/// Option quote. Options carry a single condition code.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaOptionQuote {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "bp")]
    pub bid_price: Decimal,
    #[serde(rename = "bs")]
    pub bid_size: Decimal,
    #[serde(rename = "bx", default)]
    pub bid_exchange: Option<String>,
    #[serde(rename = "ap")]
    pub ask_price: Decimal,
    #[serde(rename = "as")]
    pub ask_size: Decimal,
    #[serde(rename = "ax", default)]
    pub ask_exchange: Option<String>,
    #[serde(rename = "c", default)]
    pub condition: Option<String>,
}

impl AlpacaOptionQuote {
    pub fn into_quote(self, symbol: &str) -> OptionQuote {
        OptionQuote {
            symbol: symbol.to_string(),
            timestamp: self.timestamp,
            bid_price: self.bid_price,
            bid_size: self.bid_size,
            bid_exchange: self.bid_exchange,
            ask_price: self.ask_price,
            ask_size: self.ask_size,
            ask_exchange: self.ask_exchange,
            condition: self.condition.filter(|c| !c.trim().is_empty()),
        }
    }
}

/// Option trade.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaOptionTrade {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "s")]
    pub size: Decimal,
    #[serde(rename = "x", default)]
    pub exchange: Option<String>,
    #[serde(rename = "c", default)]
    pub condition: Option<String>,
}

impl AlpacaOptionTrade {
    pub fn into_trade(self, symbol: &str) -> OptionTrade {
        OptionTrade {
            symbol: symbol.to_string(),
            timestamp: self.timestamp,
            price: self.price,
            size: self.size,
            exchange: self.exchange,
            condition: self.condition.filter(|c| !c.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlpacaGreeks {
    #[serde(default)]
    pub delta: Option<Decimal>,
    #[serde(default)]
    pub gamma: Option<Decimal>,
    #[serde(default)]
    pub theta: Option<Decimal>,
    #[serde(default)]
    pub vega: Option<Decimal>,
    #[serde(default)]
    pub rho: Option<Decimal>,
}

impl From<AlpacaGreeks> for Greeks {
    fn from(g: AlpacaGreeks) -> Self {
        Self {
            delta: g.delta,
            gamma: g.gamma,
            theta: g.theta,
            vega: g.vega,
            rho: g.rho,
        }
    }
}

/// Option snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlpacaOptionSnapshot {
    #[serde(default)]
    pub latest_quote: Option<AlpacaOptionQuote>,
    #[serde(default)]
    pub latest_trade: Option<AlpacaOptionTrade>,
    #[serde(default)]
    pub implied_volatility: Option<Decimal>,
    #[serde(default)]
    pub greeks: Option<AlpacaGreeks>,
}

impl AlpacaOptionSnapshot {
    pub fn into_snapshot(self, symbol: &str) -> OptionSnapshot {
        OptionSnapshot {
            symbol: symbol.to_string(),
            latest_quote: self.latest_quote.map(|q| q.into_quote(symbol)),
            latest_trade: self.latest_trade.map(|t| t.into_trade(symbol)),
            implied_volatility: self.implied_volatility,
            greeks: self.greeks.map(Greeks::from),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionQuotesResponse {
    #[serde(default)]
    pub quotes: BTreeMap<String, AlpacaOptionQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionSnapshotsPage {
    #[serde(default)]
    pub snapshots: BTreeMap<String, AlpacaOptionSnapshot>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
