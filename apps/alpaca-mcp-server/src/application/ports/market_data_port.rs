//! Market Data Port (Driven Port)
//!
//! Stock and option market data from the brokerage data API.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::application::dto::{Bar, OptionQuote, OptionSnapshot, Quote, StockSnapshot, Trade};
use crate::domain::market_data::{BarWindow, Timeframe};
use crate::error::TradingError;

/// Data feed and currency selection shared by stock data calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedOptions {
    /// Data feed (`iex`, `sip`, `delayed_sip`, `otc`, or `opra`/`indicative` for options).
    pub feed: Option<String>,
    /// Price currency (ISO code).
    pub currency: Option<String>,
}

/// Historical bars request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarsQuery {
    /// Ticker symbol.
    pub symbol: String,
    /// Bar period.
    pub timeframe: Timeframe,
    /// Time range.
    pub window: BarWindow,
    /// Maximum number of bars.
    pub limit: Option<u32>,
}

/// Historical trades request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradesQuery {
    /// Ticker symbol.
    pub symbol: String,
    /// Time range.
    pub window: BarWindow,
    /// Maximum number of trades.
    pub limit: Option<u32>,
    /// `asc` or `desc`.
    pub sort: Option<String>,
    /// Feed and currency.
    pub feed: FeedOptions,
    /// As-of date for symbol mapping.
    pub asof: Option<NaiveDate>,
}

/// Port for market data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Latest quote for a stock.
    async fn get_latest_quote(
        &self,
        symbol: String,
        feed: FeedOptions,
    ) -> Result<Quote, TradingError>;

    /// Historical bars.
    async fn get_bars(&self, query: BarsQuery) -> Result<Vec<Bar>, TradingError>;

    /// Historical trades.
    async fn get_trades(&self, query: TradesQuery) -> Result<Vec<Trade>, TradingError>;

    /// Latest trade for a stock.
    async fn get_latest_trade(
        &self,
        symbol: String,
        feed: FeedOptions,
    ) -> Result<Trade, TradingError>;

    /// Latest minute bar for a stock.
    async fn get_latest_bar(&self, symbol: String, feed: FeedOptions)
    -> Result<Bar, TradingError>;

    /// Snapshots for one or more stocks.
    async fn get_snapshots(
        &self,
        symbols: Vec<String>,
        feed: FeedOptions,
    ) -> Result<Vec<StockSnapshot>, TradingError>;

    /// Latest quotes for option contracts.
    async fn get_option_latest_quotes(
        &self,
        symbols: Vec<String>,
        feed: Option<String>,
    ) -> Result<Vec<OptionQuote>, TradingError>;

    /// Snapshots (quote, trade, IV, greeks) for option contracts.
    async fn get_option_snapshots(
        &self,
        symbols: Vec<String>,
        feed: Option<String>,
    ) -> Result<Vec<OptionSnapshot>, TradingError>;
}
