//! Short multi-leg strategies that need elevated options permissions.

use crate::domain::order::{OrderClass, OrderSide};

use super::occ_symbol::OccSymbol;

/// One leg as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegIntent {
    /// Contract symbol.
    pub symbol: String,
    /// Leg direction.
    pub side: OrderSide,
}

/// Why an uncovered-options rejection happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortStrategy {
    /// Short call and short put, same strike and expiration.
    ShortStraddle,
    /// Short call and short put, different strikes, same expiration.
    ShortStrangle,
    /// Two short legs of the same type and strike, different expirations.
    ShortCalendar,
    /// Anything else that leaves an uncovered position.
    Uncovered,
}

impl ShortStrategy {
    /// Classify the submitted legs.
    #[must_use]
    pub fn classify(order_class: OrderClass, legs: &[LegIntent]) -> Self {
        if order_class != OrderClass::Mleg {
            return Self::Uncovered;
        }
        let [first, second] = legs else {
            return Self::Uncovered;
        };
        if first.side != OrderSide::Sell || second.side != OrderSide::Sell {
            return Self::Uncovered;
        }
        let (Ok(a), Ok(b)) = (
            first.symbol.parse::<OccSymbol>(),
            second.symbol.parse::<OccSymbol>(),
        ) else {
            return Self::Uncovered;
        };

        let same_expiration = a.expiration == b.expiration;
        let same_strike = a.strike == b.strike;
        let same_type = a.contract_type == b.contract_type;

        match (same_type, same_expiration, same_strike) {
            (false, true, true) => Self::ShortStraddle,
            (false, true, false) => Self::ShortStrangle,
            (true, false, true) => Self::ShortCalendar,
            _ => Self::Uncovered,
        }
    }

    /// Advice shown to the client alongside the rejection.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::ShortStraddle => {
                "Short straddles (selling a call and a put at the same strike and expiration) \
                 require Level 4 options permission. Consider a long straddle or a defined-risk \
                 iron butterfly instead."
            }
            Self::ShortStrangle => {
                "Short strangles (selling an out-of-the-money call and put) require Level 4 \
                 options permission. Consider a long strangle or an iron condor instead."
            }
            Self::ShortCalendar => {
                "Short calendar spreads require Level 4 options permission. Consider a long \
                 calendar spread or a debit spread instead."
            }
            Self::Uncovered => {
                "The order could leave an uncovered option position, which requires Level 4 \
                 options permission. Use covered or hedged strategies (covered calls, \
                 cash-secured puts, debit spreads) or ask the broker to raise the account level."
            }
        }
    }
}
