//! Alpaca MCP Server Binary
//!
//! Serves the Alpaca tool catalogue to an MCP client over stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin alpaca-mcp-server
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `ALPACA_API_KEY`: Broker API key
//! - `ALPACA_SECRET_KEY`: Broker API secret
//!
//! ## Optional
//! - `ALPACA_PAPER_TRADE`: paper trading when true (default: true)
//! - `TRADE_API_URL` / `DATA_API_URL`: base URL overrides
//! - `ALPACA_HTTP_TIMEOUT_SECS`: per-request timeout (default: 30)
//! - `ALPACA_MAX_RETRIES`: attempts per request, including the first (default: 3)
//! - `MCP_METRICS_PORT`: Prometheus listener on localhost (default: 0, disabled)
//! - `RUST_LOG`: Log level (default: alpaca_mcp_server=info)

use std::sync::Arc;

use alpaca_mcp_server::application::ports::{MarketDataPort, TradingPort};
use alpaca_mcp_server::infrastructure::alpaca::{AlpacaMarketDataAdapter, AlpacaTradingAdapter};
use alpaca_mcp_server::infrastructure::config::ServerConfig;
use alpaca_mcp_server::mcp::{Dispatcher, McpServer, ToolContext, ToolRegistry};
use alpaca_mcp_server::{metrics, telemetry};
use anyhow::Context;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    let _telemetry = telemetry::init_telemetry(&config.telemetry);

    tracing::info!("Starting Alpaca MCP server");
    log_config(&config);

    match metrics::init_metrics(config.metrics_port) {
        Ok(true) => tracing::info!(port = config.metrics_port, "Prometheus metrics enabled"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to start metrics listener, continuing without it"),
    }

    let dispatcher = create_dispatcher(&config)?;
    let registered = dispatcher.list_tools().len();
    tracing::info!(tools = registered, "Tool registry ready");

    let stdin = BufReader::new(tokio::io::stdin());
    McpServer::new(dispatcher)
        .serve(stdin, tokio::io::stdout())
        .await
        .context("stdio transport failed")?;

    tracing::info!("Alpaca MCP server stopped");
    Ok(())
}

fn create_dispatcher(config: &ServerConfig) -> anyhow::Result<Dispatcher> {
    let alpaca = config.alpaca_config();
    let trading: Arc<dyn TradingPort> = Arc::new(
        AlpacaTradingAdapter::new(&alpaca).context("failed to build trading adapter")?,
    );
    let market_data: Arc<dyn MarketDataPort> = Arc::new(
        AlpacaMarketDataAdapter::new(&alpaca).context("failed to build market data adapter")?,
    );

    Ok(Dispatcher::new(
        ToolRegistry::with_all_tools(),
        ToolContext::new(trading, market_data),
    ))
}

fn log_config(config: &ServerConfig) {
    let alpaca = config.alpaca_config();
    tracing::info!(
        environment = %config.environment,
        trading_url = alpaca.trading_base_url(),
        data_url = alpaca.data_base_url(),
        timeout_secs = config.http_timeout.as_secs(),
        max_attempts = config.max_retries,
        otel = config.telemetry.otel_enabled,
        "Configuration loaded"
    );
    if config.environment.is_live() {
        tracing::warn!("LIVE trading enabled: orders will use real money");
    }
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}
