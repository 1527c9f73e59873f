//! Bar timeframes (`5Min`, `1Hour`, `1Day`, ...) and lookback windows.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use thiserror::Error;

#[allow(clippy::expect_used)]
static TIMEFRAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)(min|hour|day|week|month)$").expect("static timeframe pattern is valid")
});

/// Unit of a bar timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeframeUnit {
    /// Minutes.
    Minute,
    /// Hours.
    Hour,
    /// Days.
    Day,
    /// Weeks.
    Week,
    /// Months.
    Month,
}

impl TimeframeUnit {
    /// Largest amount accepted for this unit.
    #[must_use]
    pub const fn max_amount(&self) -> u32 {
        match self {
            Self::Minute => 59,
            Self::Hour => 23,
            Self::Day | Self::Week | Self::Month => 365,
        }
    }

    /// Returns true for minute and hour bars.
    #[must_use]
    pub const fn is_intraday(&self) -> bool {
        matches!(self, Self::Minute | Self::Hour)
    }

    const fn suffix(&self) -> &'static str {
        match self {
            Self::Minute => "Min",
            Self::Hour => "Hour",
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }
}

/// Timeframe string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeframeError {
    /// Not of the form `<amount><unit>`.
    #[error("invalid timeframe '{0}', expected e.g. 1Min, 15Min, 1Hour, 1Day, 1Week, 1Month")]
    Format(String),
    /// Amount outside the range allowed for the unit.
    #[error("timeframe amount {amount} out of range for {unit} (1-{max})")]
    OutOfRange {
        /// Parsed amount.
        amount: u64,
        /// Unit suffix.
        unit: &'static str,
        /// Largest allowed amount.
        max: u32,
    },
}

/// Aggregation period of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeframe {
    amount: u32,
    unit: TimeframeUnit,
}

impl Timeframe {
    /// One day.
    pub const DAY: Self = Self {
        amount: 1,
        unit: TimeframeUnit::Day,
    };

    /// Parse a timeframe such as `15Min` or `1day`.
    pub fn parse(input: &str) -> Result<Self, TimeframeError> {
        let trimmed = input.trim();
        let captures = TIMEFRAME_PATTERN
            .captures(trimmed)
            .ok_or_else(|| TimeframeError::Format(input.to_string()))?;

        let unit = match captures[2].to_ascii_lowercase().as_str() {
            "min" => TimeframeUnit::Minute,
            "hour" => TimeframeUnit::Hour,
            "day" => TimeframeUnit::Day,
            "week" => TimeframeUnit::Week,
            _ => TimeframeUnit::Month,
        };

        let out_of_range = |amount: u64| TimeframeError::OutOfRange {
            amount,
            unit: unit.suffix(),
            max: unit.max_amount(),
        };
        let amount: u64 = captures[1]
            .parse()
            .map_err(|_| out_of_range(u64::MAX))?;
        if amount == 0 || amount > u64::from(unit.max_amount()) {
            return Err(out_of_range(amount));
        }

        Ok(Self {
            amount: amount as u32,
            unit,
        })
    }

    /// Number of units per bar.
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Unit of the bar.
    #[must_use]
    pub const fn unit(&self) -> TimeframeUnit {
        self.unit
    }

    /// Wall-clock span of `count` bars, for intraday units only.
    #[must_use]
    pub fn intraday_span(&self, count: u32) -> Option<Duration> {
        let units = i64::from(self.amount) * i64::from(count);
        match self.unit {
            TimeframeUnit::Minute => Some(Duration::minutes(units)),
            TimeframeUnit::Hour => Some(Duration::hours(units)),
            _ => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

/// Resolved `[start, end]` range for a historical query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarWindow {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Inclusive end.
    pub end: DateTime<Utc>,
}

impl BarWindow {
    /// Resolve a lookback window.
    ///
    /// An explicit `start` wins. Otherwise intraday timeframes with a `limit`
    /// look back exactly `limit` bars, and everything else looks back `days`.
    #[must_use]
    pub fn resolve(
        now: DateTime<Utc>,
        days: u32,
        timeframe: Timeframe,
        limit: Option<u32>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        let start = start.unwrap_or_else(|| {
            limit
                .and_then(|count| timeframe.intraday_span(count))
                .map_or_else(|| now - Duration::days(i64::from(days)), |span| now - span)
        });
        Self {
            start,
            end: end.unwrap_or(now),
        }
    }

    /// Window covering the last `days` days.
    #[must_use]
    pub fn last_days(now: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: now - Duration::days(i64::from(days)),
            end: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test_case("1Min", 1, TimeframeUnit::Minute ; "one minute")]
    #[test_case("15min", 15, TimeframeUnit::Minute ; "lowercase minutes")]
    #[test_case("4Hour", 4, TimeframeUnit::Hour ; "hours")]
    #[test_case(" 1Day ", 1, TimeframeUnit::Day ; "trimmed")]
    #[test_case("2WEEK", 2, TimeframeUnit::Week ; "uppercase weeks")]
    #[test_case("3Month", 3, TimeframeUnit::Month ; "months")]
    fn parses_valid(input: &str, amount: u32, unit: TimeframeUnit) {
        let tf = Timeframe::parse(input).unwrap();
        assert_eq!(tf.amount(), amount);
        assert_eq!(tf.unit(), unit);
    }

    #[test_case("60Min" ; "minutes over 59")]
    #[test_case("24Hour" ; "hours over 23")]
    #[test_case("366Day" ; "days over 365")]
    #[test_case("0Day" ; "zero")]
    #[test_case("99999999999999999999999Min" ; "overflow")]
    fn rejects_out_of_range(input: &str) {
        assert!(matches!(
            Timeframe::parse(input),
            Err(TimeframeError::OutOfRange { .. })
        ));
    }

    #[test_case("Day" ; "no amount")]
    #[test_case("1D" ; "short unit")]
    #[test_case("1 Day" ; "inner space")]
    #[test_case("" ; "empty")]
    fn rejects_bad_format(input: &str) {
        assert!(matches!(Timeframe::parse(input), Err(TimeframeError::Format(_))));
    }

    #[test]
    fn display_uses_api_format() {
        assert_eq!(Timeframe::parse("15min").unwrap().to_string(), "15Min");
        assert_eq!(Timeframe::DAY.to_string(), "1Day");
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 15, 0, 0).unwrap()
    }

    #[test]
    fn window_defaults_to_days() {
        let window = BarWindow::resolve(now(), 5, Timeframe::DAY, None, None, None);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 6, 5, 15, 0, 0).unwrap());
        assert_eq!(window.end, now());
    }

    #[test]
    fn window_uses_limit_for_intraday() {
        let tf = Timeframe::parse("5Min").unwrap();
        let window = BarWindow::resolve(now(), 5, tf, Some(12), None, None);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 6, 10, 14, 0, 0).unwrap());
    }

    #[test]
    fn window_ignores_limit_for_daily() {
        let window = BarWindow::resolve(now(), 2, Timeframe::DAY, Some(100), None, None);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 6, 8, 15, 0, 0).unwrap());
    }

    #[test]
    fn explicit_bounds_win() {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let tf = Timeframe::parse("1Hour").unwrap();
        let window = BarWindow::resolve(now(), 5, tf, Some(3), Some(start), Some(end));
        assert_eq!(window, BarWindow { start, end });
    }
}
