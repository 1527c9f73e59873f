//! Data Transfer Objects
//!
//! Flat response shapes returned by tools. Optional fields are omitted when
//! absent, prices are decimal strings and times are ISO-8601.

mod account;
mod asset;
mod corporate_action;
mod market;
mod market_data;
mod options;
mod order;
mod position;
mod watchlist;

pub use account::Account;
pub use asset::Asset;
pub use corporate_action::CorporateAnnouncement;
pub use market::{CalendarDay, MarketClock};
pub use market_data::{Bar, Quote, StockSnapshot, Trade};
pub use options::{Greeks, OptionContract, OptionQuote, OptionSnapshot, OptionTrade};
pub use order::{CancelResult, Order};
pub use position::{ClosePositionResult, Position};
pub use watchlist::Watchlist;
