//! Order tools: listing, stock order placement and cancellation.

use uuid::Uuid;

use super::{Ack, parse_enum};
use crate::application::dto::{CancelResult, Order};
use crate::application::ports::{OrderQuery, OrderRequest};
use crate::domain::order::{OrderPrices, OrderSide, OrderStatusFilter, OrderType, TimeInForce};
use crate::error::ToolError;
use crate::mcp::arguments::{Arguments, ParamKind, ParamSpec};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{ToolBuilder, ToolRegistry};

const DEFAULT_ORDER_LIMIT: i64 = 10;
const MAX_ORDER_LIMIT: i64 = 500;

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolBuilder::new("get_orders")
            .description("List orders by status, most recent first.")
            .param(ParamSpec::optional(
                "status",
                ParamKind::Enum(OrderStatusFilter::LITERALS),
                "Which orders to list (default all)",
            ))
            .param(ParamSpec::optional(
                "limit",
                ParamKind::Integer {
                    min: Some(1),
                    max: Some(MAX_ORDER_LIMIT),
                },
                "Maximum number of orders (default 10)",
            ))
            .build(get_orders),
    );

    registry.register(
        ToolBuilder::new("place_stock_order")
            .description(
                "Place a stock order. limit_price is required for limit and stop_limit, \
                 stop_price for stop and stop_limit, and trailing_stop takes exactly one of \
                 trail_price or trail_percent. Fields an order type does not use are rejected.",
            )
            .param(ParamSpec::required("symbol", ParamKind::String, "Stock ticker"))
            .param(ParamSpec::required(
                "side",
                ParamKind::Enum(OrderSide::LITERALS),
                "buy or sell",
            ))
            .param(
                ParamSpec::required("qty", ParamKind::Number, "Number of shares (fractional allowed)")
                    .alias(&["quantity"]),
            )
            .param(
                ParamSpec::optional(
                    "type",
                    ParamKind::Enum(OrderType::LITERALS),
                    "Order type (default market)",
                )
                .alias(&["order_type"]),
            )
            .param(ParamSpec::optional(
                "time_in_force",
                ParamKind::Enum(TimeInForce::LITERALS),
                "Time in force (default day)",
            ))
            .param(ParamSpec::optional("limit_price", ParamKind::Number, "Limit price"))
            .param(ParamSpec::optional("stop_price", ParamKind::Number, "Stop trigger price"))
            .param(ParamSpec::optional(
                "trail_price",
                ParamKind::Number,
                "Trailing offset in dollars (trailing_stop only)",
            ))
            .param(ParamSpec::optional(
                "trail_percent",
                ParamKind::Number,
                "Trailing offset in percent (trailing_stop only)",
            ))
            .param(ParamSpec::optional(
                "extended_hours",
                ParamKind::Boolean,
                "Allow execution in pre/post-market sessions (default false)",
            ))
            .param(ParamSpec::optional(
                "client_order_id",
                ParamKind::String,
                "Client order ID (generated when omitted)",
            ))
            .build(place_stock_order),
    );

    registry.register(
        ToolBuilder::new("cancel_all_orders")
            .description("Cancel every open order. Returns the per-order cancellation status.")
            .build(cancel_all_orders),
    );

    registry.register(
        ToolBuilder::new("cancel_order_by_id")
            .description("Cancel one open order by its broker order ID.")
            .param(ParamSpec::required("order_id", ParamKind::String, "Broker order ID"))
            .build(cancel_order_by_id),
    );
}

async fn get_orders(ctx: ToolContext, args: Arguments) -> Result<Vec<Order>, ToolError> {
    let status = parse_enum(&args, "status", OrderStatusFilter::parse, OrderStatusFilter::All)?;
    let limit = args.integer("limit").unwrap_or(DEFAULT_ORDER_LIMIT);
    let limit = u32::try_from(limit).map_err(|_| args.invalid("limit", "is out of range"))?;

    Ok(ctx.trading.get_orders(OrderQuery { status, limit }).await?)
}

/// Build a stock order from validated arguments, checking price fields
/// against the order type.
fn stock_order(args: &Arguments) -> Result<OrderRequest, ToolError> {
    let symbol = args.require_str("symbol")?;
    let side = parse_enum(args, "side", OrderSide::parse, OrderSide::Buy)?;
    let order_type = parse_enum(args, "type", OrderType::parse, OrderType::Market)?;
    let time_in_force = parse_enum(args, "time_in_force", TimeInForce::parse, TimeInForce::Day)?;

    let qty = args
        .positive_decimal("qty")?
        .ok_or_else(|| args.invalid("qty", "is required"))?;

    let prices = OrderPrices {
        limit_price: args.decimal("limit_price"),
        stop_price: args.decimal("stop_price"),
        trail_price: args.decimal("trail_price"),
        trail_percent: args.decimal("trail_percent"),
    };
    order_type
        .check_prices(&prices)
        .map_err(|violation| args.invalid(violation.field(), violation.to_string()))?;

    let client_order_id = args.str("client_order_id").map_or_else(
        || format!("mcp_{}", Uuid::new_v4().simple()),
        str::to_string,
    );

    Ok(OrderRequest::market(symbol, side, qty, client_order_id)
        .with_type(order_type, prices)
        .with_time_in_force(time_in_force)
        .with_extended_hours(args.boolean("extended_hours").unwrap_or(false)))
}

async fn place_stock_order(ctx: ToolContext, args: Arguments) -> Result<Order, ToolError> {
    let request = stock_order(&args)?;
    Ok(ctx.trading.place_order(request).await?)
}

async fn cancel_all_orders(
    ctx: ToolContext,
    _args: Arguments,
) -> Result<Vec<CancelResult>, ToolError> {
    Ok(ctx.trading.cancel_all_orders().await?)
}

async fn cancel_order_by_id(ctx: ToolContext, args: Arguments) -> Result<Ack, ToolError> {
    let order_id = args.require_path_id("order_id")?.to_string();
    ctx.trading.cancel_order(order_id.clone()).await?;
    Ok(Ack {
        id: order_id,
        status: "cancel_requested",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockTradingPort, OrderTarget};
    use crate::domain::order::OrderClass;
    use crate::error::{TradingError, TradingErrorKind};
    use crate::mcp::test_support::{error_body, order, text, trading_only};
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use test_case::test_case;

    #[tokio::test]
    async fn market_order_fills() {
        let mut trading = MockTradingPort::new();
        trading
            .expect_place_order()
            .withf(|req| {
                req.target
                    == OrderTarget::Single {
                        symbol: "AAPL".into(),
                        side: OrderSide::Buy,
                    }
                    && req.qty == dec!(1)
                    && req.order_type == OrderType::Market
                    && req.time_in_force == TimeInForce::Day
                    && req.order_class == OrderClass::Simple
                    && req.client_order_id.starts_with("mcp_")
            })
            .times(1)
            .returning(|_| Ok(order("AAPL", "filled")));

        let result = trading_only(trading)
            .handle(
                "place_stock_order",
                Some(json!({
                    "symbol": "AAPL",
                    "qty": 1,
                    "side": "buy",
                    "type": "market",
                    "time_in_force": "day"
                })),
            )
            .await;

        assert!(!result.is_error());
        let body = text(&result);
        assert_eq!(body["symbol"], "AAPL");
        assert_eq!(body["status"], "filled");
    }

    #[tokio::test]
    async fn market_order_with_limit_price_never_reaches_broker() {
        let mut trading = MockTradingPort::new();
        trading.expect_place_order().times(0);

        let result = trading_only(trading)
            .handle(
                "place_stock_order",
                Some(json!({
                    "symbol": "AAPL",
                    "qty": 1,
                    "side": "buy",
                    "type": "market",
                    "limit_price": 150
                })),
            )
            .await;

        let error = error_body(&result);
        assert_eq!(error["type"], "validation_error");
        assert_eq!(error["tool"], "place_stock_order");
        assert_eq!(error["field"], "limit_price");
    }

    #[test_case(json!({"symbol": "AAPL", "side": "buy"}), "qty" ; "missing qty")]
    #[test_case(json!({"symbol": "AAPL", "qty": 1}), "side" ; "missing side")]
    #[test_case(json!({"qty": 1, "side": "buy"}), "symbol" ; "missing symbol")]
    #[test_case(json!({"symbol": "AAPL", "qty": 0, "side": "buy"}), "qty" ; "zero qty")]
    #[test_case(json!({"symbol": "AAPL", "qty": 1, "side": "buy", "type": "limit"}), "limit_price" ; "limit without price")]
    #[test_case(json!({"symbol": "AAPL", "qty": 1, "side": "buy", "type": "stop_limit", "limit_price": 10}), "stop_price" ; "stop limit without stop")]
    #[test_case(json!({"symbol": "AAPL", "qty": 1, "side": "buy", "type": "trailing_stop"}), "trail_price" ; "trailing without offset")]
    #[test_case(json!({"symbol": "AAPL", "qty": 1, "side": "buy", "type": "limit", "limit_price": -5}), "limit_price" ; "negative price")]
    #[test_case(json!({"symbol": "AAPL", "qty": 1, "side": "buy", "time_in_force": "forever"}), "time_in_force" ; "unknown tif")]
    #[tokio::test]
    async fn invalid_orders_rejected_before_broker(args: serde_json::Value, field: &str) {
        let mut trading = MockTradingPort::new();
        trading.expect_place_order().times(0);

        let result = trading_only(trading)
            .handle("place_stock_order", Some(args))
            .await;

        assert_eq!(error_body(&result)["field"], field);
    }

    #[tokio::test]
    async fn aliases_and_case_are_normalized() {
        let mut trading = MockTradingPort::new();
        trading
            .expect_place_order()
            .withf(|req| {
                req.order_type == OrderType::Limit
                    && req.prices.limit_price == Some(dec!(187.5))
                    && req.qty == dec!(2.5)
                    && req.time_in_force == TimeInForce::Gtc
                    && req.client_order_id == "my-order-1"
                    && req.extended_hours
            })
            .times(1)
            .returning(|_| Ok(order("AAPL", "new")));

        let result = trading_only(trading)
            .handle(
                "place_stock_order",
                Some(json!({
                    "symbol": "AAPL",
                    "quantity": "2.5",
                    "side": "BUY",
                    "order_type": "Limit",
                    "limit_price": "187.5",
                    "time_in_force": "GTC",
                    "extended_hours": true,
                    "client_order_id": "my-order-1"
                })),
            )
            .await;

        assert!(!result.is_error());
    }

    #[tokio::test]
    async fn insufficient_funds_passes_through() {
        let mut trading = MockTradingPort::new();
        trading.expect_place_order().returning(|_| {
            Err(
                TradingError::new(TradingErrorKind::InsufficientFunds, "insufficient buying power")
                    .with_code("40310000"),
            )
        });

        let result = trading_only(trading)
            .handle(
                "place_stock_order",
                Some(json!({"symbol": "AAPL", "qty": 1000, "side": "buy"})),
            )
            .await;

        let error = error_body(&result);
        assert_eq!(error["kind"], "insufficient_funds");
        assert!(error.get("hint").is_none());
    }

    #[tokio::test]
    async fn get_orders_defaults() {
        let mut trading = MockTradingPort::new();
        trading
            .expect_get_orders()
            .with(eq(OrderQuery {
                status: OrderStatusFilter::All,
                limit: 10,
            }))
            .times(1)
            .returning(|_| Ok(vec![order("AAPL", "filled")]));

        let result = trading_only(trading).handle("get_orders", None).await;

        assert_eq!(text(&result)[0]["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn get_orders_limit_bounded() {
        let mut trading = MockTradingPort::new();
        trading.expect_get_orders().times(0);

        let result = trading_only(trading)
            .handle("get_orders", Some(json!({"limit": 501})))
            .await;

        assert_eq!(error_body(&result)["field"], "limit");
    }

    #[tokio::test]
    async fn cancel_by_id_acknowledges() {
        let mut trading = MockTradingPort::new();
        trading
            .expect_cancel_order()
            .with(eq("ord-1".to_string()))
            .times(1)
            .returning(|_| Ok(()));

        let result = trading_only(trading)
            .handle("cancel_order_by_id", Some(json!({"order_id": "ord-1"})))
            .await;

        assert_eq!(
            text(&result),
            json!({"id": "ord-1", "status": "cancel_requested"})
        );
    }

    #[tokio::test]
    async fn cancel_all_reports_statuses() {
        let mut trading = MockTradingPort::new();
        trading.expect_cancel_all_orders().returning(|| {
            Ok(vec![CancelResult {
                order_id: "ord-1".into(),
                status: 200,
            }])
        });

        let result = trading_only(trading).handle("cancel_all_orders", None).await;

        assert_eq!(text(&result), json!([{"order_id": "ord-1", "status": 200}]));
    }
}
