//! Request Dispatcher
//!
//! Looks up the tool, validates arguments against its parameter list and
//! runs the handler. Holds no state between calls.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::Instrument;

use super::arguments::Arguments;
use super::context::ToolContext;
use super::formatter;
use super::protocol::{ToolDefinition, ToolsCallResult};
use super::registry::ToolRegistry;
use crate::error::ToolError;

/// Routes tool calls to their handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
}

impl Dispatcher {
    /// Create a dispatcher over `registry`.
    pub fn new(registry: ToolRegistry, context: ToolContext) -> Self {
        Self {
            registry: Arc::new(registry),
            context,
        }
    }

    /// Definitions of every tool.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.registry.list_tools()
    }

    /// True if a tool is registered under `name`.
    #[must_use]
    pub fn has_tool(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    /// Validate and run a tool call.
    ///
    /// Argument errors are returned before any upstream request is made.
    pub async fn call(&self, name: &str, arguments: Option<Value>) -> Result<Value, ToolError> {
        let Some(tool) = self.registry.get(name) else {
            return Err(ToolError::UnknownTool(name.to_string()));
        };

        let span = tracing::info_span!("tool_call", tool = name);
        async move {
            let started = Instant::now();
            let result = match Arguments::parse(name, &tool.params, arguments) {
                Ok(args) => (tool.handler)(self.context.clone(), args).await,
                Err(e) => Err(e),
            };
            let elapsed = started.elapsed();

            match &result {
                Ok(_) => {
                    tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "Tool call succeeded");
                }
                Err(e) => {
                    tracing::warn!(
                        kind = e.label(),
                        error = %e,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Tool call failed"
                    );
                }
            }
            crate::metrics::record_tool_call(
                name,
                elapsed,
                result.as_ref().err().map(ToolError::label),
            );

            result
        }
        .instrument(span)
        .await
    }

    /// Run a tool call and format the outcome for the client.
    pub async fn handle(&self, name: &str, arguments: Option<Value>) -> ToolsCallResult {
        formatter::format_result(name, self.call(name, arguments).await)
    }
}
