//! Account DTO

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Brokerage account summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: String,
    /// Human-readable account number.
    pub account_number: String,
    /// Account status (e.g. `ACTIVE`).
    pub status: String,
    /// Account currency.
    pub currency: String,
    /// Settled cash.
    pub cash: Decimal,
    /// Current buying power.
    pub buying_power: Decimal,
    /// Total equity.
    pub equity: Decimal,
    /// Portfolio value.
    pub portfolio_value: Decimal,
    /// Equity at the previous close.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_equity: Option<Decimal>,
    /// Market value of long positions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_market_value: Option<Decimal>,
    /// Market value of short positions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_market_value: Option<Decimal>,
    /// Day-trading buying power.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daytrading_buying_power: Option<Decimal>,
    /// Options buying power.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_buying_power: Option<Decimal>,
    /// Approved options trading level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_trading_level: Option<u8>,
    /// Margin multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<Decimal>,
    /// Day trades in the last five sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daytrade_count: Option<u32>,
    /// Flagged as pattern day trader.
    pub pattern_day_trader: bool,
    /// Trading is blocked.
    pub trading_blocked: bool,
    /// Transfers are blocked.
    pub transfers_blocked: bool,
    /// Account is blocked.
    pub account_blocked: bool,
    /// Short selling is enabled.
    pub shorting_enabled: bool,
    /// Account creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
