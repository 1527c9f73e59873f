//! Status filter for order queries.

use std::fmt;

/// Which orders to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderStatusFilter {
    /// Working orders only.
    Open,
    /// Filled, canceled, expired or rejected orders.
    Closed,
    /// Everything.
    #[default]
    All,
}

impl OrderStatusFilter {
    /// Accepted argument literals.
    pub const LITERALS: &'static [&'static str] = &["open", "closed", "all"];

    /// Parse a filter, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Query-string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for OrderStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
