// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::default_trait_access
    )
)]

//! Alpaca MCP Server - Core Library
//!
//! Exposes the Alpaca brokerage API as Model Context Protocol tools.
//!
//! # Architecture
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Order vocabulary, timeframes, OCC symbols, option strategies
//! - **Application**: Ports (`TradingPort`, `MarketDataPort`) and response DTOs
//! - **Infrastructure**: Alpaca REST adapters and environment configuration
//! - **MCP**: JSON-RPC server, tool registry, argument validation
//!
//! Tool handlers depend only on the ports, so every tool can be exercised
//! against mocks without a network.

#![forbid(unsafe_code)]

/// Domain layer - trading rules with no I/O.
pub mod domain;

/// Application layer - ports and DTOs.
pub mod application;

/// Infrastructure layer - Alpaca adapters and configuration.
pub mod infrastructure;

/// MCP protocol surface and tool catalogue.
pub mod mcp;

/// Error types shared across layers.
pub mod error;

/// Tool call metrics.
pub mod metrics;

/// Tracing setup.
pub mod telemetry;

pub use error::{ToolError, TradingError, TradingErrorKind};
pub use infrastructure::alpaca::{
    AlpacaConfig, AlpacaEnvironment, AlpacaMarketDataAdapter, AlpacaTradingAdapter,
};
pub use infrastructure::config::ServerConfig;
pub use mcp::{Dispatcher, McpServer, ToolContext, ToolRegistry};
