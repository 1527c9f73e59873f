//! Time in force for orders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long an order stays working.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Valid for the current trading day only.
    #[default]
    Day,
    /// Good-til-canceled.
    Gtc,
    /// Execute in the opening auction only.
    Opg,
    /// Execute in the closing auction only.
    Cls,
    /// Immediate-or-cancel.
    Ioc,
    /// Fill-or-kill.
    Fok,
}

impl TimeInForce {
    /// Accepted argument literals.
    pub const LITERALS: &'static [&'static str] = &["day", "gtc", "opg", "cls", "ioc", "fok"];

    /// Parse a time in force, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Some(Self::Day),
            "gtc" => Some(Self::Gtc),
            "opg" => Some(Self::Opg),
            "cls" => Some(Self::Cls),
            "ioc" => Some(Self::Ioc),
            "fok" => Some(Self::Fok),
            _ => None,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Gtc => "gtc",
            Self::Opg => "opg",
            Self::Cls => "cls",
            Self::Ioc => "ioc",
            Self::Fok => "fok",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_literal_parses() {
        for literal in TimeInForce::LITERALS {
            let tif = TimeInForce::parse(literal).unwrap();
            assert_eq!(tif.as_str(), *literal);
        }
    }

    #[test]
    fn default_is_day() {
        assert_eq!(TimeInForce::default(), TimeInForce::Day);
    }

    #[test]
    fn parse_uppercase() {
        assert_eq!(TimeInForce::parse("GTC"), Some(TimeInForce::Gtc));
        assert_eq!(TimeInForce::parse("week"), None);
    }
}
