//! Market clock and calendar DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Current market status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketClock {
    /// Server time.
    pub timestamp: DateTime<Utc>,
    /// Whether the market is open now.
    pub is_open: bool,
    /// Next open.
    pub next_open: DateTime<Utc>,
    /// Next close.
    pub next_close: DateTime<Utc>,
}

/// One trading session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Session date.
    pub date: NaiveDate,
    /// Regular open, exchange local time (`HH:MM`).
    pub open: String,
    /// Regular close, exchange local time (`HH:MM`).
    pub close: String,
    /// Extended session open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_open: Option<String>,
    /// Extended session close.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_close: Option<String>,
    /// Settlement date for trades on this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_date: Option<NaiveDate>,
}
