//! Trading Port (Driven Port)
//!
//! Account, order, position, asset, watchlist, calendar and option contract
//! operations against the brokerage trading API.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::application::dto::{
    Account, Asset, CalendarDay, CancelResult, ClosePositionResult, CorporateAnnouncement,
    MarketClock, OptionContract, Order, Position, Watchlist,
};
use crate::domain::options::ContractType;
use crate::domain::order::{
    OrderClass, OrderPrices, OrderSide, OrderStatusFilter, OrderType, TimeInForce,
};
use crate::error::TradingError;

/// One leg of a multi-leg options order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLeg {
    /// OCC contract symbol.
    pub symbol: String,
    /// Leg direction.
    pub side: OrderSide,
    /// Ratio of this leg relative to the order quantity.
    pub ratio_qty: u32,
}

/// What an order trades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderTarget {
    /// Single instrument.
    Single {
        /// Symbol (equity ticker or OCC contract).
        symbol: String,
        /// Direction.
        side: OrderSide,
    },
    /// Multi-leg options order executed atomically.
    MultiLeg(Vec<OrderLeg>),
}

/// Order to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Instrument(s) traded.
    pub target: OrderTarget,
    /// Quantity.
    pub qty: Decimal,
    /// Order type.
    pub order_type: OrderType,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Order class.
    pub order_class: OrderClass,
    /// Price fields, already checked against `order_type`.
    pub prices: OrderPrices,
    /// Allow execution in extended hours.
    pub extended_hours: bool,
    /// Client order ID.
    pub client_order_id: String,
}

impl OrderRequest {
    /// Create a simple market order.
    #[must_use]
    pub fn market(
        symbol: impl Into<String>,
        side: OrderSide,
        qty: Decimal,
        client_order_id: impl Into<String>,
    ) -> Self {
        Self {
            target: OrderTarget::Single {
                symbol: symbol.into(),
                side,
            },
            qty,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Day,
            order_class: OrderClass::Simple,
            prices: OrderPrices::default(),
            extended_hours: false,
            client_order_id: client_order_id.into(),
        }
    }

    /// Set the order type and its prices.
    #[must_use]
    pub const fn with_type(mut self, order_type: OrderType, prices: OrderPrices) -> Self {
        self.order_type = order_type;
        self.prices = prices;
        self
    }

    /// Set time in force.
    #[must_use]
    pub const fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Set the order class.
    #[must_use]
    pub const fn with_order_class(mut self, order_class: OrderClass) -> Self {
        self.order_class = order_class;
        self
    }

    /// Allow extended-hours execution.
    #[must_use]
    pub const fn with_extended_hours(mut self, extended_hours: bool) -> Self {
        self.extended_hours = extended_hours;
        self
    }

    /// Symbol of a single-instrument order.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        match &self.target {
            OrderTarget::Single { symbol, .. } => Some(symbol),
            OrderTarget::MultiLeg(_) => None,
        }
    }
}

/// Order listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderQuery {
    /// Status filter.
    pub status: OrderStatusFilter,
    /// Maximum number of orders.
    pub limit: u32,
}

/// Portion of a position to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAmount {
    /// Number of shares or contracts.
    Qty(Decimal),
    /// Percentage of the position, in (0, 100].
    Percentage(Decimal),
}

/// Asset listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetQuery {
    /// `active` or `inactive`.
    pub status: Option<String>,
    /// Asset class.
    pub asset_class: Option<String>,
    /// Exchange.
    pub exchange: Option<String>,
    /// Required attributes.
    pub attributes: Vec<String>,
}

/// Changes to a watchlist. At least one field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchlistUpdate {
    /// New name.
    pub name: Option<String>,
    /// Replacement symbol list.
    pub symbols: Option<Vec<String>>,
}

/// Option contract search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionContractQuery {
    /// Underlying symbol.
    pub underlying_symbol: String,
    /// Exact expiration date.
    pub expiration_date: Option<NaiveDate>,
    /// Minimum strike.
    pub strike_price_gte: Option<Decimal>,
    /// Maximum strike.
    pub strike_price_lte: Option<Decimal>,
    /// Call or put.
    pub contract_type: Option<ContractType>,
    /// `active` or `inactive`.
    pub status: Option<String>,
    /// Root symbol.
    pub root_symbol: Option<String>,
    /// Maximum number of contracts.
    pub limit: Option<u32>,
}

/// Corporate action announcement search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementQuery {
    /// Action types (`dividend`, `merger`, `spinoff`, `split`).
    pub ca_types: Vec<String>,
    /// Start of the date range.
    pub since: NaiveDate,
    /// End of the date range.
    pub until: NaiveDate,
    /// Symbol filter.
    pub symbol: Option<String>,
    /// CUSIP filter.
    pub cusip: Option<String>,
    /// Which date the range applies to.
    pub date_type: Option<String>,
}

/// Port for brokerage trading operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradingPort: Send + Sync {
    /// Account summary.
    async fn get_account(&self) -> Result<Account, TradingError>;

    /// All open positions.
    async fn get_positions(&self) -> Result<Vec<Position>, TradingError>;

    /// Open position in one symbol.
    async fn get_open_position(&self, symbol: String) -> Result<Position, TradingError>;

    /// Close all or part of a position.
    async fn close_position(
        &self,
        symbol: String,
        amount: Option<CloseAmount>,
    ) -> Result<Order, TradingError>;

    /// Close every position, optionally canceling open orders first.
    async fn close_all_positions(
        &self,
        cancel_orders: bool,
    ) -> Result<Vec<ClosePositionResult>, TradingError>;

    /// List orders.
    async fn get_orders(&self, query: OrderQuery) -> Result<Vec<Order>, TradingError>;

    /// Submit an order.
    async fn place_order(&self, request: OrderRequest) -> Result<Order, TradingError>;

    /// Cancel every open order.
    async fn cancel_all_orders(&self) -> Result<Vec<CancelResult>, TradingError>;

    /// Cancel one order.
    async fn cancel_order(&self, order_id: String) -> Result<(), TradingError>;

    /// Look up an asset by symbol.
    async fn get_asset(&self, symbol: String) -> Result<Asset, TradingError>;

    /// List assets.
    async fn get_assets(&self, query: AssetQuery) -> Result<Vec<Asset>, TradingError>;

    /// Create a watchlist.
    async fn create_watchlist(
        &self,
        name: String,
        symbols: Vec<String>,
    ) -> Result<Watchlist, TradingError>;

    /// List watchlists.
    async fn get_watchlists(&self) -> Result<Vec<Watchlist>, TradingError>;

    /// Fetch one watchlist.
    async fn get_watchlist(&self, watchlist_id: String) -> Result<Watchlist, TradingError>;

    /// Rename a watchlist or replace its symbols.
    async fn update_watchlist(
        &self,
        watchlist_id: String,
        update: WatchlistUpdate,
    ) -> Result<Watchlist, TradingError>;

    /// Delete a watchlist.
    async fn delete_watchlist(&self, watchlist_id: String) -> Result<(), TradingError>;

    /// Market clock.
    async fn get_clock(&self) -> Result<MarketClock, TradingError>;

    /// Trading sessions between two dates, inclusive.
    async fn get_calendar(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CalendarDay>, TradingError>;

    /// Search option contracts.
    async fn get_option_contracts(
        &self,
        query: OptionContractQuery,
    ) -> Result<Vec<OptionContract>, TradingError>;

    /// Corporate action announcements.
    async fn get_corporate_announcements(
        &self,
        query: AnnouncementQuery,
    ) -> Result<Vec<CorporateAnnouncement>, TradingError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn market_order_defaults() {
        let request = OrderRequest::market("AAPL", OrderSide::Buy, dec!(1), "mcp_1");

        assert_eq!(request.order_type, OrderType::Market);
        assert_eq!(request.time_in_force, TimeInForce::Day);
        assert_eq!(request.order_class, OrderClass::Simple);
        assert_eq!(request.prices, OrderPrices::default());
        assert!(!request.extended_hours);
        assert_eq!(request.symbol(), Some("AAPL"));
    }

    #[test]
    fn builder_sets_fields() {
        let prices = OrderPrices {
            limit_price: Some(dec!(150.25)),
            ..OrderPrices::default()
        };
        let request = OrderRequest::market("AAPL", OrderSide::Sell, dec!(3), "mcp_2")
            .with_type(OrderType::Limit, prices)
            .with_time_in_force(TimeInForce::Gtc)
            .with_extended_hours(true);

        assert_eq!(request.order_type, OrderType::Limit);
        assert_eq!(request.prices.limit_price, Some(dec!(150.25)));
        assert_eq!(request.time_in_force, TimeInForce::Gtc);
        assert!(request.extended_hours);
    }

    #[test]
    fn multi_leg_has_no_symbol() {
        let request = OrderRequest {
            target: OrderTarget::MultiLeg(vec![OrderLeg {
                symbol: "AAPL250117C00150000".into(),
                side: OrderSide::Buy,
                ratio_qty: 1,
            }]),
            ..OrderRequest::market("", OrderSide::Buy, dec!(1), "mcp_opt_1")
        };
        assert!(request.symbol().is_none());
    }
}
