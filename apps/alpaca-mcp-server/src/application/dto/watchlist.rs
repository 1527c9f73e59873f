//! Watchlist DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named list of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    /// Watchlist ID.
    pub id: String,
    /// Name.
    pub name: String,
    /// Symbols, in list order.
    #[serde(default)]
    pub symbols: Vec<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
