//! Order Value Objects
//!
//! Immutable types describing an order request before it reaches the broker.

mod order_class;
mod order_side;
mod order_status_filter;
mod order_type;
mod time_in_force;

pub use order_class::OrderClass;
pub use order_side::OrderSide;
pub use order_status_filter::OrderStatusFilter;
pub use order_type::{OrderPrices, OrderType, PriceViolation};
pub use time_in_force::TimeInForce;
