//! Error types surfaced to MCP clients.
//!
//! Every tool call ends in either a payload or a [`ToolError`]. Upstream
//! brokerage failures are folded into the closed [`TradingErrorKind`] set at
//! the adapter boundary so nothing transport-specific leaks past it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failed brokerage call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingErrorKind {
    /// Credentials missing, invalid or revoked.
    AuthFailure,
    /// Account lacks the permission or level for the request.
    PermissionDenied,
    /// Symbol unknown or not tradable.
    InvalidSymbol,
    /// Not enough buying power or shares.
    InsufficientFunds,
    /// Market is closed for the requested order.
    MarketClosed,
    /// Upstream rate limit hit and retries exhausted.
    RateLimited,
    /// Referenced resource does not exist.
    NotFound,
    /// Request was understood but refused.
    Rejected,
    /// Transport failure.
    Network,
    /// Any other upstream failure.
    ApiError,
}

impl TradingErrorKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AuthFailure => "auth_failure",
            Self::PermissionDenied => "permission_denied",
            Self::InvalidSymbol => "invalid_symbol",
            Self::InsufficientFunds => "insufficient_funds",
            Self::MarketClosed => "market_closed",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::Rejected => "rejected",
            Self::Network => "network",
            Self::ApiError => "api_error",
        }
    }
}

impl std::fmt::Display for TradingErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A brokerage call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TradingError {
    /// Error classification.
    pub kind: TradingErrorKind,
    /// Upstream message, unmodified.
    pub message: String,
    /// Upstream error code when one was returned (e.g. `40310000`).
    pub code: Option<String>,
    /// Corrective advice for the client, if any applies.
    pub hint: Option<String>,
}

impl TradingError {
    /// Create an error without code or hint.
    #[must_use]
    pub fn new(kind: TradingErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            hint: None,
        }
    }

    /// Attach an upstream error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach a hint for the client.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// True if the upstream code equals `code`.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }

    /// Case-insensitive substring match on the upstream message.
    #[must_use]
    pub fn message_contains(&self, needle: &str) -> bool {
        self.message
            .to_ascii_lowercase()
            .contains(&needle.to_ascii_lowercase())
    }
}

/// Terminal outcome of a failed tool call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// Arguments did not satisfy the tool's schema.
    #[error("invalid argument `{field}` for `{tool}`: {message}")]
    Validation {
        /// Tool that was called.
        tool: String,
        /// Offending argument.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The brokerage refused or failed the request.
    #[error(transparent)]
    Trading(#[from] TradingError),

    /// No tool is registered under this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Unexpected fault inside the server.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Build a validation error.
    pub fn validation(
        tool: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            tool: tool.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Short label used for metrics and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Trading(err) => err.kind.as_str(),
            Self::UnknownTool(_) => "unknown_tool",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
