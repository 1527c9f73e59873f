//! Connection settings for the Alpaca adapters: which account, where the
//! APIs live, how long to wait and how often to retry.

use std::time::Duration;

const PAPER_TRADING_URL: &str = "https://paper-api.alpaca.markets";
const LIVE_TRADING_URL: &str = "https://api.alpaca.markets";
const MARKET_DATA_URL: &str = "https://data.alpaca.markets";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Paper or live account. Selected by `ALPACA_PAPER_TRADE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlpacaEnvironment {
    /// Simulated fills against the paper endpoint.
    #[default]
    Paper,
    /// Real orders with real money.
    Live,
}

impl AlpacaEnvironment {
    /// Trading endpoint when no override is configured.
    #[must_use]
    pub const fn trading_base_url(&self) -> &'static str {
        match self {
            Self::Paper => PAPER_TRADING_URL,
            Self::Live => LIVE_TRADING_URL,
        }
    }

    /// Market data endpoint. Paper and live accounts share it.
    #[must_use]
    pub const fn data_base_url(&self) -> &'static str {
        MARKET_DATA_URL
    }

    /// True for the live account.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

impl std::fmt::Display for AlpacaEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.is_live() { "LIVE" } else { "PAPER" })
    }
}

/// Everything an adapter needs to reach Alpaca.
///
/// Built once from [`ServerConfig`](crate::infrastructure::config::ServerConfig)
/// and shared by the trading and market data adapters.
#[derive(Clone)]
pub struct AlpacaConfig {
    /// `APCA-API-KEY-ID` header value.
    pub api_key: String,
    /// `APCA-API-SECRET-KEY` header value.
    pub api_secret: String,
    /// Account the keys belong to.
    pub environment: AlpacaEnvironment,
    /// Per-request timeout, including the body read.
    pub timeout: Duration,
    /// Retry schedule for 429, 408/5xx and transport failures.
    pub retry: RetryConfig,
    trading_url: Option<String>,
    data_url: Option<String>,
}

impl AlpacaConfig {
    /// Settings for `environment` with default endpoints, timeout and retry.
    #[must_use]
    pub fn new(api_key: String, api_secret: String, environment: AlpacaEnvironment) -> Self {
        Self {
            api_key,
            api_secret,
            environment,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            trading_url: None,
            data_url: None,
        }
    }

    /// Replace the request timeout (`ALPACA_HTTP_TIMEOUT_SECS`).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the retry schedule.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Point trading calls somewhere else (`TRADE_API_URL`).
    #[must_use]
    pub fn with_trading_url(mut self, url: impl Into<String>) -> Self {
        self.trading_url = Some(url.into());
        self
    }

    /// Point market data calls somewhere else (`DATA_API_URL`).
    #[must_use]
    pub fn with_data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = Some(url.into());
        self
    }

    /// Effective trading endpoint, without trailing slash.
    #[must_use]
    pub fn trading_base_url(&self) -> &str {
        endpoint(self.trading_url.as_deref(), self.environment.trading_base_url())
    }

    /// Effective market data endpoint, without trailing slash.
    #[must_use]
    pub fn data_base_url(&self) -> &str {
        endpoint(self.data_url.as_deref(), self.environment.data_base_url())
    }
}

fn endpoint<'a>(configured: Option<&'a str>, default: &'static str) -> &'a str {
    configured.unwrap_or(default).trim_end_matches('/')
}

impl std::fmt::Debug for AlpacaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlpacaConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("trading_base_url", &self.trading_base_url())
            .field("data_base_url", &self.data_base_url())
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Retry schedule applied by the HTTP client.
///
/// `max_attempts` counts every request, including the first.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total requests allowed per call (`ALPACA_MAX_RETRIES`).
    pub max_attempts: u32,
    /// Wait before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound on any single wait, `Retry-After` included.
    pub max_backoff: Duration,
    /// Growth factor between waits.
    pub multiplier: f64,
}

impl RetryConfig {
    /// One request, never retried.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            multiplier: 1.0,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    fn paper() -> AlpacaConfig {
        AlpacaConfig::new(
            "key".to_string(),
            "secret".to_string(),
            AlpacaEnvironment::Paper,
        )
    }

    #[test]
    fn paper_is_the_default_account() {
        assert_eq!(AlpacaEnvironment::default(), AlpacaEnvironment::Paper);
        assert!(!AlpacaEnvironment::Paper.is_live());
        assert!(AlpacaEnvironment::Live.is_live());
        assert_eq!(AlpacaEnvironment::Paper.to_string(), "PAPER");
        assert_eq!(AlpacaEnvironment::Live.to_string(), "LIVE");
    }

    #[test]
    fn endpoints_follow_environment() {
        let config = paper();
        assert_eq!(config.trading_base_url(), PAPER_TRADING_URL);
        assert_eq!(config.data_base_url(), MARKET_DATA_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);

        let live = AlpacaConfig::new("k".into(), "s".into(), AlpacaEnvironment::Live);
        assert_eq!(live.trading_base_url(), LIVE_TRADING_URL);
        assert_eq!(live.data_base_url(), MARKET_DATA_URL);
    }

    #[test]
    fn overrides_win_and_drop_trailing_slash() {
        let config = paper()
            .with_trading_url("http://localhost:9000/")
            .with_data_url("http://localhost:9001");
        assert_eq!(config.trading_base_url(), "http://localhost:9000");
        assert_eq!(config.data_base_url(), "http://localhost:9001");
    }

    #[test]
    fn debug_redacts_credentials() {
        let config = AlpacaConfig::new(
            "PKTESTKEY123".to_string(),
            "s3cr3t-value".to_string(),
            AlpacaEnvironment::Live,
        );
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("PKTESTKEY123"));
        assert!(!rendered.contains("s3cr3t-value"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains(LIVE_TRADING_URL));
    }

    #[test]
    fn retry_schedules() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.initial_backoff, Duration::from_millis(100));
        assert_eq!(retry.multiplier, 2.0);

        let none = RetryConfig::none();
        assert_eq!(none.max_attempts, 1);
        assert_eq!(none.initial_backoff, Duration::ZERO);
    }
}
