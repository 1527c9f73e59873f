//! Position DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Open position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol.
    pub symbol: String,
    /// Asset ID.
    pub asset_id: String,
    /// Asset class.
    pub asset_class: String,
    /// Exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// `long` or `short`.
    pub side: String,
    /// Quantity held.
    pub qty: Decimal,
    /// Quantity not reserved by open orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty_available: Option<Decimal>,
    /// Average entry price.
    pub avg_entry_price: Decimal,
    /// Cost basis.
    pub cost_basis: Decimal,
    /// Market value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value: Option<Decimal>,
    /// Current price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<Decimal>,
    /// Previous close.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastday_price: Option<Decimal>,
    /// Change since previous close, as a fraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_today: Option<Decimal>,
    /// Unrealized P&L.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrealized_pl: Option<Decimal>,
    /// Unrealized P&L as a fraction of cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrealized_plpc: Option<Decimal>,
    /// Unrealized P&L today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrealized_intraday_pl: Option<Decimal>,
    /// Unrealized P&L today as a fraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrealized_intraday_plpc: Option<Decimal>,
}

/// Outcome of closing one position as part of a bulk close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePositionResult {
    /// Symbol.
    pub symbol: String,
    /// HTTP status the broker reported for this symbol.
    pub status: u16,
    /// Closing order, when one was placed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Error message, when the close failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
