//! Model Context Protocol Surface
//!
//! JSON-RPC over stdio, the tool catalogue and the plumbing between them.
//!
//! - [`server`]: line-delimited JSON-RPC loop and method routing
//! - [`registry`]: tool names, descriptions, parameter lists and handlers
//! - [`arguments`]: argument validation and coercion
//! - [`dispatcher`]: runs one tool call and turns its outcome into a result
//! - [`formatter`]: success and error payload shapes

pub mod arguments;
pub mod context;
pub mod dispatcher;
pub mod formatter;
pub mod protocol;
pub mod registry;
pub mod server;

mod tools;

#[cfg(test)]
mod test_support;

pub use context::ToolContext;
pub use dispatcher::Dispatcher;
pub use registry::ToolRegistry;
pub use server::McpServer;
