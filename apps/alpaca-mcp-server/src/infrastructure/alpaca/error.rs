//! Alpaca-specific error types and their classification.

use thiserror::Error;

use crate::error::{TradingError, TradingErrorKind};

/// Errors from the Alpaca HTTP client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlpacaError {
    /// Request could not be built.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Credentials rejected (401).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Request refused (403).
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Error code from the API.
        code: Option<String>,
        /// Error message from the API.
        message: String,
    },

    /// Resource missing (404).
    #[error("Not found: {message}")]
    NotFound {
        /// Request path.
        path: String,
        /// Error message from the API.
        message: String,
    },

    /// Request understood but refused (422).
    #[error("Rejected: {message}")]
    Rejected {
        /// Error code from the API.
        code: Option<String>,
        /// Error message from the API.
        message: String,
    },

    /// Any other non-success status.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Error code from the API.
        code: Option<String>,
        /// Error message from the API.
        message: String,
    },

    /// Rate limited (429) after every retry was spent.
    #[error("Rate limited, retry after {retry_after_secs}s: {message}")]
    RateLimited {
        /// Suggested retry delay in seconds.
        retry_after_secs: u64,
        /// Error code from the API.
        code: Option<String>,
        /// Error message from the API.
        message: String,
    },

    /// Symbol or id that cannot stand alone as a URL path segment.
    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),

    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Max retries exceeded.
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Last failure seen.
        last_error: String,
    },
}

/// Kind implied by the wording of an upstream message, if any.
fn classify_message(message: &str) -> Option<TradingErrorKind> {
    let lower = message.to_ascii_lowercase();
    let any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if any(&["insufficient"]) {
        Some(TradingErrorKind::InsufficientFunds)
    } else if any(&["market is closed", "market closed", "outside of market hours"]) {
        Some(TradingErrorKind::MarketClosed)
    } else if any(&[
        "asset not found",
        "could not find asset",
        "invalid symbol",
        "unknown symbol",
        "symbol not found",
        "not tradable",
        "is not active",
    ]) {
        Some(TradingErrorKind::InvalidSymbol)
    } else {
        None
    }
}

/// Bare 403 bodies Alpaca returns for bad credentials.
fn is_credential_message(message: &str) -> bool {
    matches!(
        message.trim().trim_end_matches('.').to_ascii_lowercase().as_str(),
        "forbidden" | "unauthorized" | "access denied" | "request is not authorized"
    )
}

impl From<AlpacaError> for TradingError {
    fn from(err: AlpacaError) -> Self {
        let with_code = |error: Self, code: Option<String>| match code {
            Some(code) => error.with_code(code),
            None => error,
        };

        match err {
            AlpacaError::AuthenticationFailed(message) => {
                Self::new(TradingErrorKind::AuthFailure, message)
            }
            AlpacaError::Forbidden { code, message } => {
                let kind = if is_credential_message(&message) {
                    TradingErrorKind::AuthFailure
                } else {
                    classify_message(&message).unwrap_or(TradingErrorKind::PermissionDenied)
                };
                with_code(Self::new(kind, message), code)
            }
            AlpacaError::NotFound { message, .. } => {
                let kind = classify_message(&message).unwrap_or(TradingErrorKind::NotFound);
                Self::new(kind, message)
            }
            AlpacaError::Rejected { code, message } => {
                let kind = classify_message(&message).unwrap_or(TradingErrorKind::Rejected);
                with_code(Self::new(kind, message), code)
            }
            AlpacaError::Api {
                status,
                code,
                message,
            } => {
                let fallback = if (400..500).contains(&status) {
                    TradingErrorKind::Rejected
                } else {
                    TradingErrorKind::ApiError
                };
                let kind = classify_message(&message).unwrap_or(fallback);
                with_code(Self::new(kind, message), code)
            }
            AlpacaError::RateLimited { code, message, .. } => {
                with_code(Self::new(TradingErrorKind::RateLimited, message), code)
            }
            err @ AlpacaError::InvalidPathSegment(_) => {
                Self::new(TradingErrorKind::Rejected, err.to_string())
            }
            err @ (AlpacaError::Network(_) | AlpacaError::MaxRetriesExceeded { .. }) => {
                Self::new(TradingErrorKind::Network, err.to_string())
            }
            err @ (AlpacaError::Http(_) | AlpacaError::JsonParse(_)) => {
                Self::new(TradingErrorKind::ApiError, err.to_string())
            }
        }
    }
}
