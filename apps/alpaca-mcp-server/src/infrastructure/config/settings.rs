//! Server Configuration Settings
//!
//! Configuration types for the MCP server, loaded from environment variables.
//! Built once at startup and never mutated afterwards.

use std::time::Duration;

use crate::infrastructure::alpaca::{AlpacaConfig, AlpacaEnvironment, RetryConfig};

/// Alpaca API credentials.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the API secret.
    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Tracing export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySettings {
    /// Export spans over OTLP.
    pub otel_enabled: bool,
    /// OTLP collector endpoint.
    pub otlp_endpoint: String,
    /// Service name attached to exported spans.
    pub service_name: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            otel_enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: "alpaca-mcp-server".to_string(),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// API credentials.
    pub credentials: Credentials,
    /// Paper or live trading.
    pub environment: AlpacaEnvironment,
    /// Trading API base URL override.
    pub trade_api_url: Option<String>,
    /// Data API base URL override.
    pub data_api_url: Option<String>,
    /// HTTP request timeout.
    pub http_timeout: Duration,
    /// Maximum attempts per HTTP request, including the first.
    pub max_retries: u32,
    /// Prometheus listener port (0 = disabled).
    pub metrics_port: u16,
    /// Tracing export.
    pub telemetry: TelemetrySettings,
}

impl ServerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or a value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, "ALPACA_API_KEY")?;
        let api_secret = required(&lookup, "ALPACA_SECRET_KEY")?;

        let paper = optional(&lookup, "ALPACA_PAPER_TRADE")
            .map(|v| parse_bool("ALPACA_PAPER_TRADE", &v))
            .transpose()?
            .unwrap_or(true);
        let environment = if paper {
            AlpacaEnvironment::Paper
        } else {
            AlpacaEnvironment::Live
        };

        let http_timeout = Duration::from_secs(parse_number(
            &lookup,
            "ALPACA_HTTP_TIMEOUT_SECS",
            30_u64,
        )?);
        let max_retries = parse_number(&lookup, "ALPACA_MAX_RETRIES", 3_u32)?;
        if max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ALPACA_MAX_RETRIES".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let defaults = TelemetrySettings::default();
        let telemetry = TelemetrySettings {
            otel_enabled: optional(&lookup, "OTEL_ENABLED")
                .map(|v| parse_bool("OTEL_ENABLED", &v))
                .transpose()?
                .unwrap_or(defaults.otel_enabled),
            otlp_endpoint: optional(&lookup, "OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or(defaults.otlp_endpoint),
            service_name: optional(&lookup, "OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),
        };

        Ok(Self {
            credentials: Credentials::new(api_key, api_secret),
            environment,
            trade_api_url: optional(&lookup, "TRADE_API_URL"),
            data_api_url: optional(&lookup, "DATA_API_URL"),
            http_timeout,
            max_retries,
            metrics_port: parse_number(&lookup, "MCP_METRICS_PORT", 0_u16)?,
            telemetry,
        })
    }

    /// Build the Alpaca adapter configuration.
    #[must_use]
    pub fn alpaca_config(&self) -> AlpacaConfig {
        let retry = RetryConfig {
            max_attempts: self.max_retries,
            ..RetryConfig::default()
        };
        let mut config = AlpacaConfig::new(
            self.credentials.api_key().to_string(),
            self.credentials.api_secret().to_string(),
            self.environment,
        )
        .with_timeout(self.http_timeout)
        .with_retry(retry);

        if let Some(url) = &self.trade_api_url {
            config = config.with_trading_url(url.clone());
        }
        if let Some(url) = &self.data_api_url {
            config = config.with_data_url(url.clone());
        }
        config
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable could not be parsed.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// What was wrong.
        message: String,
    },
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::EmptyValue(key.to_string()));
    }
    Ok(value.to_string())
}

/// Present, non-blank value.
fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected true/false, got `{value}`"),
        }),
    }
}

fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional(lookup, key).map_or(Ok(default), |v| {
        v.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const CREDS: [(&str, &str); 2] = [
        ("ALPACA_API_KEY", "PKTEST"),
        ("ALPACA_SECRET_KEY", "shh"),
    ];

    #[test]
    fn defaults_with_credentials_only() {
        let config = ServerConfig::from_lookup(lookup(&CREDS)).unwrap();

        assert_eq!(config.environment, AlpacaEnvironment::Paper);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.metrics_port, 0);
        assert!(config.trade_api_url.is_none());
        assert_eq!(config.telemetry, TelemetrySettings::default());

        let alpaca = config.alpaca_config();
        assert_eq!(alpaca.trading_base_url(), "https://paper-api.alpaca.markets");
        assert_eq!(alpaca.data_base_url(), "https://data.alpaca.markets");
        assert_eq!(alpaca.retry.max_attempts, 3);
    }

    #[test]
    fn missing_and_empty_credentials() {
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::MissingEnvVar("ALPACA_API_KEY".to_string())
        );
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[
                ("ALPACA_API_KEY", "PKTEST"),
                ("ALPACA_SECRET_KEY", "  "),
            ]))
            .unwrap_err(),
            ConfigError::EmptyValue("ALPACA_SECRET_KEY".to_string())
        );
    }

    #[test]
    fn paper_trade_flag_variants() {
        for (raw, paper) in [("false", false), ("0", false), ("NO", false), ("yes", true)] {
            let mut pairs = CREDS.to_vec();
            pairs.push(("ALPACA_PAPER_TRADE", raw));
            let config = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
            assert_eq!(config.environment.is_live(), !paper, "{raw}");
        }

        let mut pairs = CREDS.to_vec();
        pairs.push(("ALPACA_PAPER_TRADE", "maybe"));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn overrides_flow_into_alpaca_config() {
        let mut pairs = CREDS.to_vec();
        pairs.extend([
            ("TRADE_API_URL", "http://127.0.0.1:9000/"),
            ("DATA_API_URL", "http://127.0.0.1:9001"),
            ("ALPACA_HTTP_TIMEOUT_SECS", "5"),
            ("ALPACA_MAX_RETRIES", "1"),
            ("MCP_METRICS_PORT", "9464"),
            ("OTEL_ENABLED", "true"),
            ("OTEL_SERVICE_NAME", "mcp-test"),
        ]);
        let config = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.metrics_port, 9464);
        assert!(config.telemetry.otel_enabled);
        assert_eq!(config.telemetry.service_name, "mcp-test");

        let alpaca = config.alpaca_config();
        assert_eq!(alpaca.trading_base_url(), "http://127.0.0.1:9000");
        assert_eq!(alpaca.data_base_url(), "http://127.0.0.1:9001");
        assert_eq!(alpaca.timeout, Duration::from_secs(5));
        assert_eq!(alpaca.retry.max_attempts, 1);
    }

    #[test]
    fn invalid_numbers_rejected() {
        let mut pairs = CREDS.to_vec();
        pairs.push(("ALPACA_HTTP_TIMEOUT_SECS", "soon"));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidValue { key, .. }) if key == "ALPACA_HTTP_TIMEOUT_SECS"
        ));

        let mut pairs = CREDS.to_vec();
        pairs.push(("ALPACA_MAX_RETRIES", "0"));
        assert!(ServerConfig::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn credentials_redacted_debug() {
        let creds = Credentials::new("key123".to_string(), "secret456".to_string());
        let debug = format!("{creds:?}");
        assert!(!debug.contains("key123"));
        assert!(!debug.contains("secret456"));
        assert!(debug.contains("[REDACTED]"));
    }
}
