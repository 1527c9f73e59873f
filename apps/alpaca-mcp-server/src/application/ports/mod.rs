//! Application Ports (Driven)
//!
//! Outbound interfaces to the brokerage. Tool handlers only ever talk to
//! these traits, which keeps them testable against mocks.

mod market_data_port;
mod trading_port;

pub use market_data_port::{BarsQuery, FeedOptions, MarketDataPort, TradesQuery};
pub use trading_port::{
    AnnouncementQuery, AssetQuery, CloseAmount, OptionContractQuery, OrderLeg, OrderQuery,
    OrderRequest, OrderTarget, TradingPort, WatchlistUpdate,
};

#[cfg(test)]
pub use market_data_port::MockMarketDataPort;
#[cfg(test)]
pub use trading_port::MockTradingPort;
