//! MCP Tools
//!
//! One module per tool group. Each exposes `register`, which adds its tools
//! to the registry; handlers are plain async functions over
//! [`ToolContext`](super::context::ToolContext) and validated
//! [`Arguments`](super::arguments::Arguments).

mod account;
mod assets;
mod corporate_actions;
mod market;
mod market_data;
mod options;
mod orders;
mod positions;
mod watchlists;

use serde::Serialize;

use super::arguments::Arguments;
use super::registry::ToolRegistry;
use crate::error::ToolError;

/// Register every tool.
pub fn register_all(registry: &mut ToolRegistry) {
    account::register(registry);
    positions::register(registry);
    orders::register(registry);
    options::register(registry);
    assets::register(registry);
    watchlists::register(registry);
    market::register(registry);
    corporate_actions::register(registry);
    market_data::register(registry);
}

/// Acknowledgement for calls whose upstream response has no body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Ack {
    id: String,
    status: &'static str,
}

/// Parse an enum argument already restricted to `T`'s literals.
fn parse_enum<T>(
    args: &Arguments,
    name: &str,
    parse: fn(&str) -> Option<T>,
    default: T,
) -> Result<T, ToolError> {
    match args.str(name) {
        None => Ok(default),
        Some(raw) => parse(raw).ok_or_else(|| args.invalid(name, format!("unsupported value `{raw}`"))),
    }
}

/// Optional integer argument as `u32`.
fn optional_u32(args: &Arguments, name: &str) -> Result<Option<u32>, ToolError> {
    match args.integer(name) {
        None => Ok(None),
        Some(n) => u32::try_from(n)
            .map(Some)
            .map_err(|_| args.invalid(name, "is out of range")),
    }
}
