//! Asset DTO

use serde::{Deserialize, Serialize};

/// Tradable instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset ID.
    pub id: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Company or instrument name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Asset class (`us_equity`, `us_option`, `crypto`).
    pub asset_class: String,
    /// Primary exchange.
    pub exchange: String,
    /// `active` or `inactive`.
    pub status: String,
    /// Tradable at the broker.
    pub tradable: bool,
    /// Marginable.
    pub marginable: bool,
    /// Shortable.
    pub shortable: bool,
    /// Easy to borrow.
    pub easy_to_borrow: bool,
    /// Fractional shares supported.
    pub fractionable: bool,
    /// Extra attributes (e.g. `ptp_no_exception`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}
