//! Order side (buy/sell).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an order or option leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy.
    Buy,
    /// Sell.
    Sell,
}

impl OrderSide {
    /// Accepted argument literals.
    pub const LITERALS: &'static [&'static str] = &["buy", "sell"];

    /// Parse a side, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(OrderSide::parse("BUY"), Some(OrderSide::Buy));
        assert_eq!(OrderSide::parse("Sell"), Some(OrderSide::Sell));
        assert_eq!(OrderSide::parse("short"), None);
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&OrderSide::Sell).unwrap(), "\"sell\"");
        let side: OrderSide = serde_json::from_str("\"buy\"").unwrap();
        assert_eq!(side, OrderSide::Buy);
    }
}
