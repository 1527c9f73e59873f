//! OCC option symbols: `ROOT` + `YYMMDD` + `C|P` + strike x 1000 (8 digits).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SUFFIX_LEN: usize = 15;
const MAX_ROOT_LEN: usize = 6;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

impl ContractType {
    /// Accepted argument literals.
    pub const LITERALS: &'static [&'static str] = &["call", "put"];

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

/// Symbol is not a valid OCC contract symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not an OCC option symbol (e.g. AAPL250117C00150000)")]
pub struct OccSymbolError(pub String);

/// Parsed option contract symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OccSymbol {
    /// Underlying root, e.g. `AAPL`.
    pub root: String,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Call or put.
    pub contract_type: ContractType,
    /// Strike price.
    pub strike: Decimal,
}

impl FromStr for OccSymbol {
    type Err = OccSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || OccSymbolError(s.to_string());
        let symbol = s.trim();
        if !symbol.is_ascii()
            || symbol.len() <= SUFFIX_LEN
            || symbol.len() > SUFFIX_LEN + MAX_ROOT_LEN
        {
            return Err(err());
        }

        let (root, suffix) = symbol.split_at(symbol.len() - SUFFIX_LEN);
        if !root.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(err());
        }

        let (date, rest) = suffix.split_at(6);
        let (kind, strike) = rest.split_at(1);

        let expiration =
            NaiveDate::parse_from_str(&format!("20{date}"), "%Y%m%d").map_err(|_| err())?;
        let contract_type = match kind {
            "C" | "c" => ContractType::Call,
            "P" | "p" => ContractType::Put,
            _ => return Err(err()),
        };
        if !strike.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let strike_thousandths: i64 = strike.parse().map_err(|_| err())?;

        Ok(Self {
            root: root.to_ascii_uppercase(),
            expiration,
            contract_type,
            strike: Decimal::new(strike_thousandths, 3).normalize(),
        })
    }
}

impl fmt::Display for OccSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let thousandths = (self.strike * Decimal::ONE_THOUSAND)
            .trunc()
            .to_i64()
            .unwrap_or_default();
        write!(
            f,
            "{}{}{}{:08}",
            self.root,
            self.expiration.format("%y%m%d"),
            match self.contract_type {
                ContractType::Call => 'C',
                ContractType::Put => 'P',
            },
            thousandths
        )
    }
}
