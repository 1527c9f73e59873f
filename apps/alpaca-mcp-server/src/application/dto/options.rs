//! Option contract and option market data DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Listed option contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Contract ID.
    pub id: String,
    /// OCC symbol.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// `active` or `inactive`.
    pub status: String,
    /// Tradable at the broker.
    pub tradable: bool,
    /// Expiration date.
    pub expiration_date: NaiveDate,
    /// Root symbol.
    pub root_symbol: String,
    /// Underlying symbol.
    pub underlying_symbol: String,
    /// `call` or `put`.
    pub contract_type: String,
    /// `american` or `european`.
    pub style: String,
    /// Strike price.
    pub strike_price: Decimal,
    /// Shares per contract.
    pub size: Decimal,
    /// Open interest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<Decimal>,
    /// Date of the open interest figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interest_date: Option<NaiveDate>,
    /// Last close price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_price: Option<Decimal>,
    /// Date of the close price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_price_date: Option<NaiveDate>,
}

/// Option best bid and offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// OCC symbol.
    pub symbol: String,
    /// Quote time.
    pub timestamp: DateTime<Utc>,
    /// Bid price.
    pub bid_price: Decimal,
    /// Bid size.
    pub bid_size: Decimal,
    /// Bid exchange code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_exchange: Option<String>,
    /// Ask price.
    pub ask_price: Decimal,
    /// Ask size.
    pub ask_size: Decimal,
    /// Ask exchange code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_exchange: Option<String>,
    /// Quote condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Option trade print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTrade {
    /// OCC symbol.
    pub symbol: String,
    /// Trade time.
    pub timestamp: DateTime<Utc>,
    /// Price.
    pub price: Decimal,
    /// Contracts.
    pub size: Decimal,
    /// Exchange code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// Trade condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Option sensitivities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Decimal>,
    /// Gamma.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<Decimal>,
    /// Theta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta: Option<Decimal>,
    /// Vega.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vega: Option<Decimal>,
    /// Rho.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rho: Option<Decimal>,
}

/// Latest quote, trade, implied volatility and greeks for a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSnapshot {
    /// OCC symbol.
    pub symbol: String,
    /// Latest quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_quote: Option<OptionQuote>,
    /// Latest trade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_trade: Option<OptionTrade>,
    /// Implied volatility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_volatility: Option<Decimal>,
    /// Greeks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeks: Option<Greeks>,
}
