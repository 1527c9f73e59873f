//! Order type and the price fields each type accepts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Order type specifying execution behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Execute at best available price.
    #[default]
    Market,
    /// Execute at the limit price or better.
    Limit,
    /// Becomes a market order once the stop price trades.
    Stop,
    /// Becomes a limit order once the stop price trades.
    StopLimit,
    /// Stop that follows the market by a fixed amount or percentage.
    TrailingStop,
}

/// Optional price fields of an order request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderPrices {
    /// Limit price.
    pub limit_price: Option<Decimal>,
    /// Stop trigger price.
    pub stop_price: Option<Decimal>,
    /// Trailing offset in dollars.
    pub trail_price: Option<Decimal>,
    /// Trailing offset in percent.
    pub trail_percent: Option<Decimal>,
}

impl OrderPrices {
    fn supplied(&self) -> impl Iterator<Item = (&'static str, Decimal)> {
        [
            ("limit_price", self.limit_price),
            ("stop_price", self.stop_price),
            ("trail_price", self.trail_price),
            ("trail_percent", self.trail_percent),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// A price field breaks the rules of its order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceViolation {
    /// Field required by the order type is absent.
    #[error("{field} is required for {order_type} orders")]
    Missing {
        /// Offending field.
        field: &'static str,
        /// Order type being placed.
        order_type: OrderType,
    },
    /// Field not accepted by the order type.
    #[error("{field} is not allowed for {order_type} orders")]
    Forbidden {
        /// Offending field.
        field: &'static str,
        /// Order type being placed.
        order_type: OrderType,
    },
    /// Trailing stop needs exactly one trailing offset.
    #[error("trailing_stop orders take exactly one of trail_price or trail_percent")]
    TrailingOffset {
        /// Field reported to the caller.
        field: &'static str,
    },
    /// Price must be strictly positive.
    #[error("{field} must be greater than zero")]
    NotPositive {
        /// Offending field.
        field: &'static str,
    },
}

impl PriceViolation {
    /// Name of the argument at fault.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Missing { field, .. }
            | Self::Forbidden { field, .. }
            | Self::TrailingOffset { field }
            | Self::NotPositive { field } => field,
        }
    }
}

impl OrderType {
    /// Accepted argument literals.
    pub const LITERALS: &'static [&'static str] =
        &["market", "limit", "stop", "stop_limit", "trailing_stop"];

    /// Parse an order type, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "market" => Some(Self::Market),
            "limit" => Some(Self::Limit),
            "stop" => Some(Self::Stop),
            "stop_limit" => Some(Self::StopLimit),
            "trailing_stop" => Some(Self::TrailingStop),
            _ => None,
        }
    }

    /// Returns true if this order type requires a limit price.
    #[must_use]
    pub const fn requires_limit_price(&self) -> bool {
        matches!(self, Self::Limit | Self::StopLimit)
    }

    /// Returns true if this order type requires a stop price.
    #[must_use]
    pub const fn requires_stop_price(&self) -> bool {
        matches!(self, Self::Stop | Self::StopLimit)
    }

    /// Returns true if this order type takes a trailing offset.
    #[must_use]
    pub const fn is_trailing(&self) -> bool {
        matches!(self, Self::TrailingStop)
    }

    /// Check supplied prices against this order type.
    ///
    /// Every price must be positive, every field the type does not use must
    /// be absent, and every field it needs must be present.
    pub fn check_prices(&self, prices: &OrderPrices) -> Result<(), PriceViolation> {
        if let Some((field, _)) = prices.supplied().find(|(_, v)| *v <= Decimal::ZERO) {
            return Err(PriceViolation::NotPositive { field });
        }

        let forbidden = |field: &'static str, value: Option<Decimal>, allowed: bool| {
            if value.is_some() && !allowed {
                Err(PriceViolation::Forbidden {
                    field,
                    order_type: *self,
                })
            } else {
                Ok(())
            }
        };
        forbidden("limit_price", prices.limit_price, self.requires_limit_price())?;
        forbidden("stop_price", prices.stop_price, self.requires_stop_price())?;
        forbidden("trail_price", prices.trail_price, self.is_trailing())?;
        forbidden("trail_percent", prices.trail_percent, self.is_trailing())?;

        if self.requires_limit_price() && prices.limit_price.is_none() {
            return Err(PriceViolation::Missing {
                field: "limit_price",
                order_type: *self,
            });
        }
        if self.requires_stop_price() && prices.stop_price.is_none() {
            return Err(PriceViolation::Missing {
                field: "stop_price",
                order_type: *self,
            });
        }
        if self.is_trailing() {
            match (prices.trail_price, prices.trail_percent) {
                (Some(_), None) | (None, Some(_)) => {}
                (Some(_), Some(_)) => {
                    return Err(PriceViolation::TrailingOffset {
                        field: "trail_percent",
                    });
                }
                (None, None) => {
                    return Err(PriceViolation::TrailingOffset {
                        field: "trail_price",
                    });
                }
            }
        }

        Ok(())
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::Stop => "stop",
            Self::StopLimit => "stop_limit",
            Self::TrailingStop => "trailing_stop",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
