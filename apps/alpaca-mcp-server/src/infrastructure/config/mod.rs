//! Configuration Module
//!
//! Startup configuration for the MCP server, loaded from environment
//! variables (optionally seeded from a `.env` file by `main`).

mod settings;

pub use settings::{ConfigError, Credentials, ServerConfig, TelemetrySettings};
