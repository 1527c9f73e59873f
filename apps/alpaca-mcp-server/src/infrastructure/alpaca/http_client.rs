//! Authenticated REST client shared by both Alpaca adapters.
//!
//! Every brokerage request goes through [`AlpacaHttpClient::request`], and it
//! is the only place that retries: 429 waits for `Retry-After`, while
//! 408/5xx and transport failures back off exponentially with jitter.
//! Everything else fails on the first response.

use std::time::Duration;

use rand::Rng;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::AlpacaErrorResponse;
use super::config::{AlpacaConfig, RetryConfig};
use super::error::AlpacaError;

/// Which Alpaca API a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Api {
    Trading,
    Data,
}

/// Fallback wait reported when a 429 carries no `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// HTTP client for the Alpaca trading and market data APIs.
#[derive(Debug, Clone)]
pub struct AlpacaHttpClient {
    client: Client,
    api_key: String,
    api_secret: String,
    trading_base_url: String,
    data_base_url: String,
    retry: RetryConfig,
}

impl AlpacaHttpClient {
    /// Create a client from adapter configuration.
    pub fn new(config: &AlpacaConfig) -> Result<Self, AlpacaError> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(AlpacaError::AuthenticationFailed(
                "API key and secret are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AlpacaError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            trading_base_url: config.trading_base_url().to_string(),
            data_base_url: config.data_base_url().to_string(),
            retry: config.retry.clone(),
        })
    }

    /// GET from the trading API.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AlpacaError> {
        self.request(Method::GET, Api::Trading, path, query, None::<&()>)
            .await
    }

    /// GET from the market data API.
    pub async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AlpacaError> {
        self.request(Method::GET, Api::Data, path, query, None::<&()>)
            .await
    }

    /// POST a JSON body to the trading API.
    #[allow(clippy::future_not_send)]
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AlpacaError> {
        self.request(Method::POST, Api::Trading, path, &[], Some(body))
            .await
    }

    /// PUT a JSON body to the trading API.
    #[allow(clippy::future_not_send)]
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AlpacaError> {
        self.request(Method::PUT, Api::Trading, path, &[], Some(body))
            .await
    }

    /// DELETE on the trading API, decoding the response body.
    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AlpacaError> {
        self.request(Method::DELETE, Api::Trading, path, query, None::<&()>)
            .await
    }

    /// DELETE on the trading API, ignoring whatever body comes back.
    pub async fn delete(&self, path: &str) -> Result<(), AlpacaError> {
        let _: serde_json::Value = self.delete_json(path, &[]).await?;
        Ok(())
    }

    fn base_url(&self, api: Api) -> &str {
        match api {
            Api::Trading => &self.trading_base_url,
            Api::Data => &self.data_base_url,
        }
    }

    #[allow(clippy::future_not_send)]
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        api: Api,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, AlpacaError> {
        let url = format!("{}{path}", self.base_url(api));
        let mut budget = RetryBudget::new(&self.retry);

        loop {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .header("APCA-API-KEY-ID", &self.api_key)
                .header("APCA-API-SECRET-KEY", &self.api_secret);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    let Some(delay) = budget.next_delay() else {
                        return Err(budget.transport_exhausted(e.to_string()));
                    };
                    tracing::warn!(
                        error = %e,
                        %method,
                        path,
                        delay_ms = delay.as_millis(),
                        attempt = budget.attempts(),
                        "Alpaca unreachable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };

            if response.status().is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| AlpacaError::Network(e.to_string()))?;
                return decode(&text);
            }

            let failure = Failure::read(response).await;
            let Some(reason) = retry_reason(failure.status) else {
                tracing::debug!(
                    %method,
                    path,
                    status = failure.status.as_u16(),
                    code = ?failure.code,
                    message = %failure.message,
                    "Alpaca request failed"
                );
                return Err(failure.into_error(path));
            };

            let Some(backoff) = budget.next_delay() else {
                return Err(failure.exhausted(reason, budget.attempts()));
            };
            let delay = match reason {
                RetryReason::RateLimited => failure
                    .retry_after
                    .map_or(backoff, |wait| wait.min(self.retry.max_backoff)),
                RetryReason::Transient => backoff,
            };
            tracing::warn!(
                %method,
                path,
                status = failure.status.as_u16(),
                message = %failure.message,
                delay_ms = delay.as_millis(),
                attempt = budget.attempts(),
                "Alpaca request will be retried"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Decode a success body. Empty bodies (204, bare DELETEs) decode as `null`.
fn decode<T: DeserializeOwned>(text: &str) -> Result<T, AlpacaError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| AlpacaError::JsonParse(e.to_string()))
}

/// Why a failed response may be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryReason {
    RateLimited,
    Transient,
}

const fn retry_reason(status: StatusCode) -> Option<RetryReason> {
    match status.as_u16() {
        429 => Some(RetryReason::RateLimited),
        408 | 500 | 502 | 503 | 504 => Some(RetryReason::Transient),
        _ => None,
    }
}

/// A non-success response reduced to what classification needs.
#[derive(Debug)]
struct Failure {
    status: StatusCode,
    code: Option<String>,
    message: String,
    retry_after: Option<Duration>,
}

impl Failure {
    async fn read(response: Response) -> Self {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response.text().await.unwrap_or_default();
        Self::from_body(status, &body, retry_after)
    }

    fn from_body(status: StatusCode, body: &str, retry_after: Option<Duration>) -> Self {
        let (code, message) = match serde_json::from_str::<AlpacaErrorResponse>(body) {
            Ok(parsed) if !parsed.message.is_empty() => (parsed.code_string(), parsed.message),
            _ if body.trim().is_empty() => (
                None,
                status.canonical_reason().unwrap_or("unknown error").to_string(),
            ),
            _ => (None, body.to_string()),
        };
        Self {
            status,
            code,
            message,
            retry_after,
        }
    }

    /// Error for a response that will not be retried.
    fn into_error(self, path: &str) -> AlpacaError {
        let Self {
            status,
            code,
            message,
            ..
        } = self;
        match status {
            StatusCode::UNAUTHORIZED => AlpacaError::AuthenticationFailed(message),
            StatusCode::FORBIDDEN => AlpacaError::Forbidden { code, message },
            StatusCode::NOT_FOUND => AlpacaError::NotFound {
                path: path.to_string(),
                message,
            },
            StatusCode::UNPROCESSABLE_ENTITY => AlpacaError::Rejected { code, message },
            _ => AlpacaError::Api {
                status: status.as_u16(),
                code,
                message,
            },
        }
    }

    /// Error once a retryable failure has used up the budget.
    fn exhausted(self, reason: RetryReason, attempts: u32) -> AlpacaError {
        match reason {
            RetryReason::RateLimited => AlpacaError::RateLimited {
                retry_after_secs: self
                    .retry_after
                    .map_or(DEFAULT_RETRY_AFTER_SECS, |d| d.as_secs()),
                code: self.code,
                message: self.message,
            },
            RetryReason::Transient => AlpacaError::MaxRetriesExceeded {
                attempts,
                last_error: format!("{}: {}", self.status.as_u16(), self.message),
            },
        }
    }
}

/// Attempt budget and delay schedule for one logical request.
///
/// `limit` counts every request, so `3` means one try and two retries.
#[derive(Debug)]
struct RetryBudget {
    used: u32,
    limit: u32,
    delay: Duration,
    ceiling: Duration,
    growth: f64,
}

impl RetryBudget {
    const fn new(config: &RetryConfig) -> Self {
        Self {
            used: 0,
            limit: config.max_attempts,
            delay: config.initial_backoff,
            ceiling: config.max_backoff,
            growth: config.multiplier,
        }
    }

    const fn attempts(&self) -> u32 {
        self.used
    }

    /// Record a failed attempt. Returns the wait before the next one, or
    /// `None` when no attempts remain.
    fn next_delay(&mut self) -> Option<Duration> {
        self.used += 1;
        if self.used >= self.limit {
            return None;
        }

        let planned = self.delay;
        self.delay = self.delay.mul_f64(self.growth).min(self.ceiling);
        Some(jittered(planned, self.ceiling))
    }

    fn transport_exhausted(&self, error: String) -> AlpacaError {
        if self.used <= 1 {
            AlpacaError::Network(error)
        } else {
            AlpacaError::MaxRetriesExceeded {
                attempts: self.used,
                last_error: error,
            }
        }
    }
}

/// Spread `delay` by up to ±20%, never above `ceiling`.
fn jittered(delay: Duration, ceiling: Duration) -> Duration {
    if delay.is_zero() {
        return delay;
    }
    delay
        .mul_f64(rand::rng().random_range(0.8..=1.2))
        .min(ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn near(actual: Duration, expected: Duration) -> bool {
        actual >= expected.mul_f64(0.8) && actual <= expected.mul_f64(1.2)
    }

    #[test_case(429, Some(RetryReason::RateLimited) ; "too many requests")]
    #[test_case(408, Some(RetryReason::Transient) ; "request timeout")]
    #[test_case(500, Some(RetryReason::Transient) ; "internal error")]
    #[test_case(503, Some(RetryReason::Transient) ; "unavailable")]
    #[test_case(400, None ; "bad request")]
    #[test_case(403, None ; "forbidden")]
    #[test_case(422, None ; "unprocessable")]
    fn retry_reasons(status: u16, expected: Option<RetryReason>) {
        let status = StatusCode::from_u16(status).unwrap();
        assert_eq!(retry_reason(status), expected);
    }

    #[test]
    fn budget_doubles_until_exhausted() {
        let mut budget = RetryBudget::new(&RetryConfig {
            max_attempts: 4,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        });

        for expected in [100, 200, 400] {
            let delay = budget.next_delay().unwrap();
            assert!(near(delay, Duration::from_millis(expected)), "{delay:?}");
        }
        assert!(budget.next_delay().is_none());
        assert_eq!(budget.attempts(), 4);
    }

    #[test]
    fn budget_delay_is_capped() {
        let mut budget = RetryBudget::new(&RetryConfig {
            max_attempts: 10,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(5),
            multiplier: 10.0,
        });

        budget.next_delay();
        let capped = budget.next_delay().unwrap();
        assert!(capped <= Duration::from_secs(5));
        assert!(capped >= Duration::from_secs(4));
    }

    #[test]
    fn single_attempt_budget_reports_plain_network_error() {
        let mut budget = RetryBudget::new(&RetryConfig::none());
        assert!(budget.next_delay().is_none());
        assert!(matches!(
            budget.transport_exhausted("connection refused".into()),
            AlpacaError::Network(_)
        ));
    }

    #[test]
    fn failure_prefers_structured_body() {
        let failure = Failure::from_body(
            StatusCode::FORBIDDEN,
            r#"{"code": 40310000, "message": "insufficient buying power"}"#,
            None,
        );
        assert_eq!(failure.code.as_deref(), Some("40310000"));
        assert_eq!(
            failure.into_error("/v2/orders"),
            AlpacaError::Forbidden {
                code: Some("40310000".into()),
                message: "insufficient buying power".into(),
            }
        );
    }

    #[test]
    fn failure_falls_back_to_raw_text_or_reason() {
        let raw = Failure::from_body(StatusCode::BAD_REQUEST, "bad symbol", None);
        assert_eq!(raw.message, "bad symbol");

        let empty = Failure::from_body(StatusCode::NOT_FOUND, "  ", None);
        assert_eq!(
            empty.into_error("/v2/positions/XYZ"),
            AlpacaError::NotFound {
                path: "/v2/positions/XYZ".into(),
                message: "Not Found".into(),
            }
        );
    }

    #[test]
    fn exhausted_rate_limit_keeps_retry_after() {
        let failure = Failure::from_body(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"code":42910000,"message":"rate limit exceeded"}"#,
            Some(Duration::from_secs(7)),
        );
        assert_eq!(
            failure.exhausted(RetryReason::RateLimited, 3),
            AlpacaError::RateLimited {
                retry_after_secs: 7,
                code: Some("42910000".into()),
                message: "rate limit exceeded".into(),
            }
        );
    }

    #[test]
    fn empty_success_body_decodes_as_null() {
        let value: serde_json::Value = decode("").unwrap();
        assert!(value.is_null());
        let list: Option<Vec<u32>> = decode(" ").unwrap();
        assert!(list.is_none());
        assert!(matches!(
            decode::<Vec<u32>>("{oops"),
            Err(AlpacaError::JsonParse(_))
        ));
    }

    #[test]
    fn empty_credentials_rejected() {
        let config = AlpacaConfig::new(
            String::new(),
            "secret".to_string(),
            super::super::AlpacaEnvironment::Paper,
        );
        assert!(matches!(
            AlpacaHttpClient::new(&config),
            Err(AlpacaError::AuthenticationFailed(_))
        ));
    }
}
