//! Alpaca Adapters
//!
//! REST client for the Alpaca trading and market data APIs.
//!
//! - [`AlpacaHttpClient`]: authenticated requests with bounded retry
//! - [`AlpacaTradingAdapter`]: implements [`TradingPort`](crate::application::ports::TradingPort)
//! - [`AlpacaMarketDataAdapter`]: implements [`MarketDataPort`](crate::application::ports::MarketDataPort)

mod api_types;
mod config;
mod error;
mod http_client;
mod market_data;
mod trading;

pub use config::{AlpacaConfig, AlpacaEnvironment, RetryConfig};
pub use error::AlpacaError;
pub use http_client::AlpacaHttpClient;
pub use market_data::AlpacaMarketDataAdapter;
pub use trading::AlpacaTradingAdapter;
