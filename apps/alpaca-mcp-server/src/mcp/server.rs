//! MCP stdio Server
//!
//! Newline-delimited JSON-RPC 2.0. Requests are handled one at a time in
//! arrival order; notifications never get a response.

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use super::dispatcher::Dispatcher;
use super::protocol::{
    InitializeParams, InitializeResult, JSONRPC_VERSION, MCP_PROTOCOL_VERSION, McpError,
    McpRequest, McpResponse, RequestId, ServerCapabilities, ServerInfo, ToolsCallParams,
    ToolsCapability, ToolsListResult, methods,
};

/// Name reported in the `initialize` result.
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

/// MCP session over one reader/writer pair.
#[derive(Debug)]
pub struct McpServer {
    dispatcher: Dispatcher,
    initialized: bool,
    shutdown: bool,
}

impl McpServer {
    /// Create a server that routes tool calls through `dispatcher`.
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            initialized: false,
            shutdown: false,
        }
    }

    /// Serve until end of input or a `shutdown` request.
    pub async fn serve<R, W>(mut self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                match serde_json::to_string(&response) {
                    Ok(mut json) => {
                        json.push('\n');
                        writer.write_all(json.as_bytes()).await?;
                        writer.flush().await?;
                    }
                    Err(e) => error!(error = %e, "Failed to serialize MCP response"),
                }
            }

            if self.shutdown {
                info!("Shutdown requested by client");
                break;
            }
        }

        debug!("MCP input closed");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_message(&mut self, text: &str) -> Option<McpResponse> {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                return Some(McpResponse::error(None, McpError::ParseError(e.to_string())));
            }
        };

        let request: McpRequest = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = value
                    .get("id")
                    .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());
                return Some(McpResponse::error(
                    id,
                    McpError::InvalidRequest(e.to_string()),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(McpResponse::error(
                request.id,
                McpError::InvalidRequest(format!("unsupported jsonrpc version {}", request.jsonrpc)),
            ));
        }

        if request.is_notification() {
            Self::handle_notification(&request);
            return None;
        }
        let id = request.id.clone()?;

        let result = match request.method.as_str() {
            methods::INITIALIZE => self.initialize(request.params),
            methods::PING => Ok(Value::Object(serde_json::Map::new())),
            methods::SHUTDOWN => {
                self.shutdown = true;
                Ok(Value::Object(serde_json::Map::new()))
            }
            methods::TOOLS_LIST if !self.initialized => Err(not_initialized()),
            methods::TOOLS_LIST => to_value(ToolsListResult {
                tools: self.dispatcher.list_tools(),
            }),
            methods::TOOLS_CALL if !self.initialized => Err(not_initialized()),
            methods::TOOLS_CALL => self.tools_call(request.params).await,
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        Some(match result {
            Ok(value) => McpResponse::success(id, value),
            Err(error) => McpResponse::error(Some(id), error),
        })
    }

    fn handle_notification(request: &McpRequest) {
        match request.method.as_str() {
            methods::INITIALIZED => debug!("Client finished initialization"),
            other => debug!(method = other, "Ignoring notification"),
        }
    }

    fn initialize(&mut self, params: Option<Value>) -> Result<Value, McpError> {
        let params: InitializeParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .unwrap_or_default();

        if let Some(requested) = params.protocol_version.as_deref() {
            if requested != MCP_PROTOCOL_VERSION {
                warn!(
                    requested,
                    supported = MCP_PROTOCOL_VERSION,
                    "Client requested a different protocol version"
                );
            }
        }
        info!(
            client = params.client_info.as_ref().map(|c| c.name.as_str()),
            client_version = params
                .client_info
                .as_ref()
                .and_then(|c| c.version.as_deref()),
            "MCP session initialized"
        );

        self.initialized = true;
        to_value(InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    async fn tools_call(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: ToolsCallParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;

        if !self.dispatcher.has_tool(&params.name) {
            return Err(McpError::InvalidParams(format!(
                "unknown tool: {}",
                params.name
            )));
        }

        let result = self.dispatcher.handle(&params.name, params.arguments).await;
        to_value(result)
    }
}

fn not_initialized() -> McpError {
    McpError::InvalidRequest("server not initialized".to_string())
}

fn to_value<T: Serialize>(value: T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError(e.to_string()))
}
