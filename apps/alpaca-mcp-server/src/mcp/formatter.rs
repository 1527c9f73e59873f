//! Response Formatter
//!
//! Turns a tool outcome into the MCP `tools/call` result. Successful payloads
//! are pretty-printed JSON; failures set `isError` and carry a JSON object
//! tagged by error type. Internal faults stay opaque to the client.

use serde::Serialize;
use serde_json::Value;

use super::protocol::ToolsCallResult;
use crate::error::{ToolError, TradingErrorKind};

/// Message returned for internal faults; details go to the log only.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ErrorBody<'a> {
    ValidationError {
        tool: &'a str,
        field: &'a str,
        message: &'a str,
    },
    TradingError {
        kind: TradingErrorKind,
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<&'a str>,
    },
    InternalError {
        message: &'static str,
    },
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

/// Format the outcome of calling `tool`.
#[must_use]
pub fn format_result(tool: &str, result: Result<Value, ToolError>) -> ToolsCallResult {
    match result {
        Ok(payload) => format_success(tool, &payload),
        Err(err) => format_error(tool, &err),
    }
}

fn format_success(tool: &str, payload: &Value) -> ToolsCallResult {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => ToolsCallResult::text(text),
        Err(e) => format_error(tool, &ToolError::Internal(e.to_string())),
    }
}

/// Format a failed call.
#[must_use]
pub fn format_error(tool: &str, err: &ToolError) -> ToolsCallResult {
    let body = match err {
        ToolError::Validation {
            tool,
            field,
            message,
        } => ErrorBody::ValidationError {
            tool,
            field,
            message,
        },
        ToolError::UnknownTool(name) => ErrorBody::ValidationError {
            tool: name,
            field: "name",
            message: "unknown tool",
        },
        ToolError::Trading(e) => ErrorBody::TradingError {
            kind: e.kind,
            message: &e.message,
            code: e.code.as_deref(),
            hint: e.hint.as_deref(),
        },
        ToolError::Internal(detail) => {
            tracing::error!(tool, error = %detail, "Internal error during tool call");
            ErrorBody::InternalError {
                message: INTERNAL_ERROR_MESSAGE,
            }
        }
    };

    let text = serde_json::to_string_pretty(&ErrorEnvelope { error: body }).unwrap_or_else(|_| {
        format!(r#"{{"error":{{"type":"internal_error","message":"{INTERNAL_ERROR_MESSAGE}"}}}}"#)
    });
    ToolsCallResult::error(text)
}
