//! MCP Tool Registry
//!
//! Explicit name → handler table, built once at startup.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::arguments::{Arguments, ParamSpec, object_schema};
use super::context::ToolContext;
use super::protocol::ToolDefinition;
use super::tools;
use crate::error::ToolError;

// ============================================================================
// Tool Types
// ============================================================================

/// Result type for tool execution.
pub type ToolResult = Result<Value, ToolError>;

/// Boxed future for async tool execution.
pub type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// Tool handler function type.
pub type ToolHandler = Arc<dyn Fn(ToolContext, Arguments) -> ToolFuture + Send + Sync>;

/// A registered tool with metadata and handler.
pub struct RegisteredTool {
    /// Unique name.
    pub name: &'static str,
    /// Description shown to clients.
    pub description: &'static str,
    /// Declared parameters.
    pub params: Vec<ParamSpec>,
    /// Handler.
    pub handler: ToolHandler,
}

impl RegisteredTool {
    /// Definition advertised in `tools/list`.
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: object_schema(&self.params),
        }
    }
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("name", &self.name)
            .field("params", &self.params.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Registry of tools, keyed and ordered by name.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, RegisteredTool>,
}

impl ToolRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every brokerage tool.
    #[must_use]
    pub fn with_all_tools() -> Self {
        let mut registry = Self::new();
        tools::register_all(&mut registry);
        registry
    }

    /// Register a tool, replacing any previous tool with the same name.
    pub fn register(&mut self, tool: RegisteredTool) {
        if self.tools.contains_key(tool.name) {
            tracing::warn!(tool = tool.name, "Replacing already registered tool");
        }
        self.tools.insert(tool.name, tool);
    }

    /// Look up a tool.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// Definitions of every tool, sorted by name.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(RegisteredTool::definition).collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for registering a tool.
pub struct ToolBuilder {
    name: &'static str,
    description: &'static str,
    params: Vec<ParamSpec>,
}

impl ToolBuilder {
    /// Start a tool definition.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            description: "",
            params: Vec::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub const fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Declare a parameter.
    #[must_use]
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Finish with a handler whose output is serialized to JSON.
    pub fn build<F, Fut, T>(self, handler: F) -> RegisteredTool
    where
        F: Fn(ToolContext, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ToolError>> + Send + 'static,
        T: Serialize,
    {
        let handler = Arc::new(handler);
        RegisteredTool {
            name: self.name,
            description: self.description,
            params: self.params,
            handler: Arc::new(move |ctx: ToolContext, args: Arguments| -> ToolFuture {
                let fut = handler(ctx, args);
                Box::pin(async move { Ok(serde_json::to_value(fut.await?)?) })
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::arguments::ParamKind;
    use std::collections::HashSet;

    #[test]
    fn all_tools_have_unique_sorted_names() {
        let registry = ToolRegistry::with_all_tools();
        let tools = registry.list_tools();

        assert!(!tools.is_empty());
        assert_eq!(tools.len(), registry.len());

        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());

        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn listing_is_stable() {
        let a = ToolRegistry::with_all_tools().list_tools();
        let b = ToolRegistry::with_all_tools().list_tools();
        assert_eq!(a, b);
    }

    #[test]
    fn every_tool_is_described() {
        for tool in ToolRegistry::with_all_tools().list_tools() {
            assert!(!tool.description.is_empty(), "{} has no description", tool.name);
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        }
    }

    #[test]
    fn catalogue_contains_core_tools() {
        let registry = ToolRegistry::with_all_tools();
        for name in [
            "get_account_info",
            "get_positions",
            "place_stock_order",
            "place_option_market_order",
            "get_stock_bars",
            "get_option_snapshot",
            "get_corporate_announcements",
        ] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        assert_eq!(registry.len(), 29);
    }

    #[test]
    fn builder_records_params() {
        let tool = ToolBuilder::new("echo")
            .description("Echo a symbol")
            .param(ParamSpec::required("symbol", ParamKind::String, "Ticker"))
            .build(|_ctx, args| async move {
                Ok::<_, ToolError>(args.require_str("symbol")?.to_string())
            });

        let definition = tool.definition();
        assert_eq!(definition.name, "echo");
        assert_eq!(definition.input_schema["required"][0], "symbol");
    }

    #[test]
    fn register_replaces_duplicate() {
        let mut registry = ToolRegistry::new();
        registry.register(ToolBuilder::new("a").build(|_, _| async { Ok::<_, ToolError>(1) }));
        registry.register(ToolBuilder::new("a").build(|_, _| async { Ok::<_, ToolError>(2) }));
        assert_eq!(registry.len(), 1);
    }
}
