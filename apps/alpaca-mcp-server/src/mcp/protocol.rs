//! MCP Protocol Types
//!
//! JSON-RPC 2.0 envelopes plus the MCP lifecycle and tools messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol version we support.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

// ============================================================================
// Core Message Types
// ============================================================================

/// Incoming message. Notifications carry no `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct McpRequest {
    /// Must be `"2.0"`.
    pub jsonrpc: String,
    /// Request id, absent for notifications.
    #[serde(default)]
    pub id: Option<RequestId>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

impl McpRequest {
    /// True for notifications, which never get a response.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Response to the client.
#[derive(Debug, Clone, Serialize)]
pub struct McpResponse {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// Echoed request id; `null` when the request could not be parsed.
    pub id: Option<RequestId>,
    /// Success payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpErrorResponse>,
}

impl McpResponse {
    /// Successful response.
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Error response.
    #[must_use]
    pub fn error(id: Option<RequestId>, error: McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Request ID can be string or number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RequestId {
    /// String id.
    String(String),
    /// Numeric id.
    Number(i64),
}

/// Error response structure.
#[derive(Debug, Clone, Serialize)]
pub struct McpErrorResponse {
    /// JSON-RPC error code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Extra detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// ============================================================================
// Error Codes
// ============================================================================

/// Protocol-level failures. Tool failures are reported inside a successful
/// `tools/call` result instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum McpError {
    /// Message was not valid JSON.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Message was not a valid request, or arrived before `initialize`.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Unknown method.
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    /// Bad or missing params, including unknown tool names.
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    /// Server fault.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl McpError {
    /// JSON-RPC error code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::ParseError(_) => -32700,
            Self::InvalidRequest(_) => -32600,
            Self::MethodNotFound(_) => -32601,
            Self::InvalidParams(_) => -32602,
            Self::InternalError(_) => -32603,
        }
    }
}

impl From<McpError> for McpErrorResponse {
    fn from(err: McpError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            data: None,
        }
    }
}

// ============================================================================
// MCP Method Names
// ============================================================================

/// Method names handled by the server.
pub mod methods {
    /// Lifecycle: handshake.
    pub const INITIALIZE: &str = "initialize";
    /// Lifecycle: client finished the handshake (notification).
    pub const INITIALIZED: &str = "notifications/initialized";
    /// Lifecycle: client is going away.
    pub const SHUTDOWN: &str = "shutdown";
    /// List tools.
    pub const TOOLS_LIST: &str = "tools/list";
    /// Call a tool.
    pub const TOOLS_CALL: &str = "tools/call";
    /// Liveness check.
    pub const PING: &str = "ping";
}

// ============================================================================
// Initialize Messages
// ============================================================================

/// `initialize` params. Only the client info is looked at, and only for logs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by the client.
    #[serde(default)]
    pub protocol_version: Option<String>,
    /// Client identity.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// Client identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// `initialize` result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Negotiated protocol version.
    pub protocol_version: String,
    /// What this server offers.
    pub capabilities: ServerCapabilities,
    /// Server identity.
    pub server_info: ServerInfo,
}

/// Server capabilities; tools only.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tools capability.
    pub tools: ToolsCapability,
}

/// Tools capability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// The tool list never changes at runtime.
    pub list_changed: bool,
}

/// Server identity.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

// ============================================================================
// Tools Messages
// ============================================================================

/// `tools/list` result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolsListResult {
    /// All tools, sorted by name.
    pub tools: Vec<ToolDefinition>,
}

/// One tool as advertised to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// What the tool does.
    pub description: String,
    /// JSON Schema of the arguments object.
    pub input_schema: Value,
}

/// `tools/call` params.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsCallParams {
    /// Tool name.
    pub name: String,
    /// Tool arguments.
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// `tools/call` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCallResult {
    /// Result content blocks.
    pub content: Vec<ToolResultContent>,
    /// Set when the call failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content block of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolResultContent {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
}

impl ToolsCallResult {
    /// Successful text result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent::Text { text: text.into() }],
            is_error: None,
        }
    }

    /// Failed text result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    /// Text of the first content block.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| match c {
            ToolResultContent::Text { text } => text.as_str(),
        })
    }

    /// True if the call failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}
