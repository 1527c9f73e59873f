//! Order class (simple, bracket, multi-leg, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order class as understood by the broker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderClass {
    /// Single order.
    #[default]
    Simple,
    /// Entry with take-profit and stop-loss.
    Bracket,
    /// One-cancels-other.
    Oco,
    /// One-triggers-other.
    Oto,
    /// Multi-leg options order.
    Mleg,
}

impl OrderClass {
    /// Accepted argument literals.
    pub const LITERALS: &'static [&'static str] = &["simple", "bracket", "oco", "oto", "mleg"];

    /// Parse an order class, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "bracket" => Some(Self::Bracket),
            "oco" => Some(Self::Oco),
            "oto" => Some(Self::Oto),
            "mleg" => Some(Self::Mleg),
            _ => None,
        }
    }

    /// Default class for an options order with `leg_count` legs.
    #[must_use]
    pub const fn for_leg_count(leg_count: usize) -> Self {
        if leg_count > 1 { Self::Mleg } else { Self::Simple }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Bracket => "bracket",
            Self::Oco => "oco",
            Self::Oto => "oto",
            Self::Mleg => "mleg",
        }
    }
}

impl fmt::Display for OrderClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
