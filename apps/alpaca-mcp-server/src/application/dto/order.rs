//! Order DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order as reported by the broker.
///
/// Enumerated fields stay strings: the broker may report values (e.g. an
/// empty side on a multi-leg parent) that requests never carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Broker order ID.
    pub id: String,
    /// Client order ID.
    pub client_order_id: String,
    /// Symbol (empty for multi-leg parents).
    pub symbol: String,
    /// Asset class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<String>,
    /// Side.
    pub side: String,
    /// Order type.
    pub order_type: String,
    /// Order class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_class: Option<String>,
    /// Time in force.
    pub time_in_force: String,
    /// Status (`new`, `filled`, `canceled`, ...).
    pub status: String,
    /// Ordered quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,
    /// Notional amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notional: Option<Decimal>,
    /// Filled quantity.
    pub filled_qty: Decimal,
    /// Average fill price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled_avg_price: Option<Decimal>,
    /// Limit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    /// Stop price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    /// Trailing offset in dollars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trail_price: Option<Decimal>,
    /// Trailing offset in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trail_percent: Option<Decimal>,
    /// Leg ratio (multi-leg children only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio_qty: Option<Decimal>,
    /// Eligible for extended hours.
    pub extended_hours: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Submission time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Fill time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled_at: Option<DateTime<Utc>>,
    /// Cancel time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
    /// Expiry time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
    /// Failure time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
    /// Child legs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legs: Vec<Order>,
}

/// Outcome of one cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResult {
    /// Order ID.
    pub order_id: String,
    /// HTTP status the broker reported for this order.
    pub status: u16,
}
