//! Options tools: contract search, quotes, snapshots and market orders.
//!
//! Multi-leg orders are sent as a single `mleg` order so the broker fills
//! all legs atomically. When the broker refuses an order for lack of
//! uncovered-options permission, the submitted legs are classified to
//! explain which strategy needs the higher level.

use uuid::Uuid;

use super::{optional_u32, parse_enum};
use crate::application::dto::{OptionContract, OptionQuote, OptionSnapshot, Order};
use crate::application::ports::{OptionContractQuery, OrderLeg, OrderRequest, OrderTarget};
use crate::domain::options::{ContractType, LegIntent, OccSymbol, ShortStrategy};
use crate::domain::order::{OrderClass, OrderSide, OrderType, TimeInForce};
use crate::error::{ToolError, TradingError, TradingErrorKind};
use crate::mcp::arguments::{Arguments, ParamKind, ParamSpec};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{ToolBuilder, ToolRegistry};

const MAX_LEGS: usize = 4;
const UNCOVERED_CODE: &str = "40310000";
const OPTION_FEEDS: &[&str] = &["opra", "indicative"];
const CONTRACT_STATUSES: &[&str] = &["active", "inactive"];
const PERMISSION_HINT: &str = "Check the account's options trading level; the requested \
    strategy may need a higher level than the account has.";

fn leg_fields() -> Vec<ParamSpec> {
    vec![
        ParamSpec::required(
            "symbol",
            ParamKind::String,
            "OCC option symbol, e.g. AAPL250117C00150000",
        ),
        ParamSpec::required("side", ParamKind::Enum(OrderSide::LITERALS), "buy or sell"),
        ParamSpec::optional(
            "ratio_qty",
            ParamKind::Integer {
                min: Some(1),
                max: None,
            },
            "Ratio of this leg to the order quantity (default 1)",
        ),
    ]
}

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolBuilder::new("get_option_contracts")
            .description(
                "Search option contracts for an underlying. Returns one page unless limit is set.",
            )
            .param(ParamSpec::required(
                "underlying_symbol",
                ParamKind::String,
                "Underlying ticker, e.g. SPY",
            ))
            .param(ParamSpec::optional(
                "expiration_date",
                ParamKind::Date,
                "Exact expiration date (YYYY-MM-DD)",
            ))
            .param(ParamSpec::optional(
                "strike_price_gte",
                ParamKind::Number,
                "Minimum strike price",
            ))
            .param(ParamSpec::optional(
                "strike_price_lte",
                ParamKind::Number,
                "Maximum strike price",
            ))
            .param(ParamSpec::optional(
                "type",
                ParamKind::Enum(ContractType::LITERALS),
                "call or put",
            ))
            .param(ParamSpec::optional(
                "status",
                ParamKind::Enum(CONTRACT_STATUSES),
                "Contract status",
            ))
            .param(ParamSpec::optional(
                "root_symbol",
                ParamKind::String,
                "Option root symbol",
            ))
            .param(ParamSpec::optional(
                "limit",
                ParamKind::Integer {
                    min: Some(1),
                    max: Some(10_000),
                },
                "Maximum number of contracts",
            ))
            .build(get_option_contracts),
    );

    registry.register(
        ToolBuilder::new("get_option_latest_quote")
            .description("Latest bid/ask quote for one option contract.")
            .param(ParamSpec::required(
                "symbol",
                ParamKind::String,
                "OCC option symbol, e.g. AAPL250117C00150000",
            ))
            .param(ParamSpec::optional(
                "feed",
                ParamKind::Enum(OPTION_FEEDS),
                "opra (subscription) or indicative",
            ))
            .build(get_option_latest_quote),
    );

    registry.register(
        ToolBuilder::new("get_option_snapshot")
            .description(
                "Snapshots for one or more option contracts: latest quote and trade, implied \
                 volatility and greeks.",
            )
            .param(
                ParamSpec::required(
                    "symbols",
                    ParamKind::StringList,
                    "OCC option symbol, or a list / comma-separated string of them",
                )
                .alias(&["symbol_or_symbols"]),
            )
            .param(ParamSpec::optional(
                "feed",
                ParamKind::Enum(OPTION_FEEDS),
                "opra (subscription) or indicative",
            ))
            .build(get_option_snapshot),
    );

    registry.register(
        ToolBuilder::new("place_option_market_order")
            .description(
                "Place a market order for 1 to 4 option legs. One leg defaults to a simple \
                 order; several legs default to mleg and execute atomically. Short straddles, \
                 strangles and calendars need Level 4 options permission.",
            )
            .param(ParamSpec::required(
                "legs",
                ParamKind::Objects {
                    fields: leg_fields(),
                    min: 1,
                    max: MAX_LEGS,
                },
                "Order legs: [{symbol, side, ratio_qty}]",
            ))
            .param(ParamSpec::optional(
                "order_class",
                ParamKind::Enum(OrderClass::LITERALS),
                "Order class (default simple for one leg, mleg for several)",
            ))
            .param(
                ParamSpec::optional(
                    "qty",
                    ParamKind::Integer {
                        min: Some(1),
                        max: None,
                    },
                    "Number of contracts, or strategy units for mleg (default 1)",
                )
                .alias(&["quantity"]),
            )
            .param(ParamSpec::optional(
                "time_in_force",
                ParamKind::Enum(TimeInForce::LITERALS),
                "Only day is supported for options",
            ))
            .param(ParamSpec::optional(
                "extended_hours",
                ParamKind::Boolean,
                "Allow execution in extended hours (default false)",
            ))
            .build(place_option_market_order),
    );
}

async fn get_option_contracts(
    ctx: ToolContext,
    args: Arguments,
) -> Result<Vec<OptionContract>, ToolError> {
    let strike_price_gte = args.decimal("strike_price_gte");
    let strike_price_lte = args.decimal("strike_price_lte");
    if let (Some(low), Some(high)) = (strike_price_gte, strike_price_lte) {
        if low > high {
            return Err(args.invalid(
                "strike_price_lte",
                "must not be below strike_price_gte",
            ));
        }
    }

    let contract_type = args.str("type").map(|t| match t {
        "put" => ContractType::Put,
        _ => ContractType::Call,
    });

    let query = OptionContractQuery {
        underlying_symbol: args.require_str("underlying_symbol")?.to_string(),
        expiration_date: args.date("expiration_date"),
        strike_price_gte,
        strike_price_lte,
        contract_type,
        status: args.str("status").map(str::to_string),
        root_symbol: args.str("root_symbol").map(str::to_string),
        limit: optional_u32(&args, "limit")?,
    };
    Ok(ctx.trading.get_option_contracts(query).await?)
}

async fn get_option_latest_quote(
    ctx: ToolContext,
    args: Arguments,
) -> Result<OptionQuote, ToolError> {
    let symbol = args.require_str("symbol")?.to_string();
    let feed = args.str("feed").map(str::to_string);

    let quotes = ctx
        .market_data
        .get_option_latest_quotes(vec![symbol.clone()], feed)
        .await?;
    quotes.into_iter().next().ok_or_else(|| {
        TradingError::new(
            TradingErrorKind::NotFound,
            format!("no quote found for {symbol}"),
        )
        .into()
    })
}

async fn get_option_snapshot(
    ctx: ToolContext,
    args: Arguments,
) -> Result<Vec<OptionSnapshot>, ToolError> {
    let symbols = args.require_list("symbols")?.to_vec();
    let feed = args.str("feed").map(str::to_string);
    Ok(ctx.market_data.get_option_snapshots(symbols, feed).await?)
}

/// Validated option order plus the leg intents used to explain rejections.
fn option_order(args: &Arguments) -> Result<(OrderRequest, Vec<LegIntent>), ToolError> {
    let time_in_force = parse_enum(args, "time_in_force", TimeInForce::parse, TimeInForce::Day)?;
    if time_in_force != TimeInForce::Day {
        return Err(args.invalid("time_in_force", "only day is supported for options"));
    }

    let legs = args.objects("legs");
    if legs.is_empty() {
        return Err(args.invalid("legs", "is required"));
    }

    let mut order_legs = Vec::with_capacity(legs.len());
    for leg in legs {
        let symbol = leg.require_str("symbol")?;
        symbol
            .parse::<OccSymbol>()
            .map_err(|e| leg.invalid("symbol", e.to_string()))?;
        let side = parse_enum(leg, "side", OrderSide::parse, OrderSide::Buy)?;
        let ratio_qty = optional_u32(leg, "ratio_qty")?.unwrap_or(1);
        order_legs.push(OrderLeg {
            symbol: symbol.to_string(),
            side,
            ratio_qty,
        });
    }

    let order_class = parse_enum(
        args,
        "order_class",
        OrderClass::parse,
        OrderClass::for_leg_count(order_legs.len()),
    )?;
    if order_legs.len() > 1 && order_class != OrderClass::Mleg {
        return Err(args.invalid(
            "order_class",
            "orders with more than one leg must use mleg",
        ));
    }

    let qty = args.integer("qty").unwrap_or(1);
    if qty <= 0 {
        return Err(args.invalid("qty", "must be greater than zero"));
    }

    let intents = order_legs
        .iter()
        .map(|leg| LegIntent {
            symbol: leg.symbol.clone(),
            side: leg.side,
        })
        .collect();

    let target = match (order_class, order_legs.as_slice()) {
        (OrderClass::Mleg, _) => OrderTarget::MultiLeg(order_legs),
        (_, [leg]) => OrderTarget::Single {
            symbol: leg.symbol.clone(),
            side: leg.side,
        },
        _ => OrderTarget::MultiLeg(order_legs),
    };

    let request = OrderRequest {
        target,
        qty: qty.into(),
        order_type: OrderType::Market,
        time_in_force,
        order_class,
        prices: Default::default(),
        extended_hours: args.boolean("extended_hours").unwrap_or(false),
        client_order_id: format!("mcp_opt_{}", Uuid::new_v4().simple()),
    };
    Ok((request, intents))
}

fn explain_rejection(err: TradingError, order_class: OrderClass, legs: &[LegIntent]) -> TradingError {
    if err.has_code(UNCOVERED_CODE) && err.message_contains("uncovered") {
        let strategy = ShortStrategy::classify(order_class, legs);
        err.with_hint(strategy.hint())
    } else if err.kind == TradingErrorKind::PermissionDenied {
        err.with_hint(PERMISSION_HINT)
    } else {
        err
    }
}

async fn place_option_market_order(ctx: ToolContext, args: Arguments) -> Result<Order, ToolError> {
    let (request, legs) = option_order(&args)?;
    let order_class = request.order_class;

    ctx.trading
        .place_order(request)
        .await
        .map_err(|e| explain_rejection(e, order_class, &legs).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockMarketDataPort, MockTradingPort};
    use crate::mcp::test_support::{error_body, market_data_only, order, text, trading_only};
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const CALL: &str = "SPY250620C00550000";
    const PUT: &str = "SPY250620P00550000";
    const PUT_LOW: &str = "SPY250620P00530000";

    #[tokio::test]
    async fn single_leg_is_simple_with_top_level_symbol() {
        let mut trading = MockTradingPort::new();
        trading
            .expect_place_order()
            .withf(|req| {
                req.order_class == OrderClass::Simple
                    && req.order_type == OrderType::Market
                    && req.qty == dec!(2)
                    && req.client_order_id.starts_with("mcp_opt_")
                    && req.target
                        == OrderTarget::Single {
                            symbol: CALL.into(),
                            side: OrderSide::Buy,
                        }
            })
            .times(1)
            .returning(|_| Ok(order(CALL, "accepted")));

        let result = trading_only(trading)
            .handle(
                "place_option_market_order",
                Some(json!({"legs": [{"symbol": CALL, "side": "buy"}], "quantity": 2})),
            )
            .await;

        assert_eq!(text(&result)["symbol"], CALL);
    }

    #[tokio::test]
    async fn several_legs_default_to_mleg() {
        let mut trading = MockTradingPort::new();
        trading
            .expect_place_order()
            .withf(|req| {
                req.order_class == OrderClass::Mleg
                    && req.target
                        == OrderTarget::MultiLeg(vec![
                            OrderLeg {
                                symbol: CALL.into(),
                                side: OrderSide::Buy,
                                ratio_qty: 1,
                            },
                            OrderLeg {
                                symbol: PUT.into(),
                                side: OrderSide::Buy,
                                ratio_qty: 1,
                            },
                        ])
            })
            .times(1)
            .returning(|_| Ok(order("", "accepted")));

        let result = trading_only(trading)
            .handle(
                "place_option_market_order",
                Some(json!({"legs": [
                    {"symbol": CALL, "side": "buy", "ratio_qty": 1},
                    {"symbol": PUT, "side": "buy", "ratio_qty": 1}
                ]})),
            )
            .await;

        assert!(!result.is_error());
    }

    #[tokio::test]
    async fn too_many_legs_rejected() {
        let mut trading = MockTradingPort::new();
        trading.expect_place_order().times(0);
        let leg = json!({"symbol": CALL, "side": "buy"});

        let result = trading_only(trading)
            .handle(
                "place_option_market_order",
                Some(json!({"legs": [leg.clone(), leg.clone(), leg.clone(), leg.clone(), leg]})),
            )
            .await;

        assert_eq!(error_body(&result)["field"], "legs");
    }

    #[tokio::test]
    async fn bad_leg_fields_are_indexed() {
        let mut trading = MockTradingPort::new();
        trading.expect_place_order().times(0);
        let dispatcher = trading_only(trading);

        let result = dispatcher
            .handle(
                "place_option_market_order",
                Some(json!({"legs": [
                    {"symbol": CALL, "side": "buy"},
                    {"symbol": "SPY", "side": "sell"}
                ]})),
            )
            .await;
        assert_eq!(error_body(&result)["field"], "legs[1].symbol");

        let result = dispatcher
            .handle(
                "place_option_market_order",
                Some(json!({"legs": [{"symbol": CALL, "side": "buy", "ratio_qty": 0}]})),
            )
            .await;
        assert_eq!(error_body(&result)["field"], "legs[0].ratio_qty");
    }

    #[tokio::test]
    async fn only_day_orders() {
        let mut trading = MockTradingPort::new();
        trading.expect_place_order().times(0);

        let result = trading_only(trading)
            .handle(
                "place_option_market_order",
                Some(json!({"legs": [{"symbol": CALL, "side": "buy"}], "time_in_force": "gtc"})),
            )
            .await;

        assert_eq!(error_body(&result)["field"], "time_in_force");
    }

    #[tokio::test]
    async fn multi_leg_requires_mleg_class() {
        let mut trading = MockTradingPort::new();
        trading.expect_place_order().times(0);

        let result = trading_only(trading)
            .handle(
                "place_option_market_order",
                Some(json!({
                    "legs": [{"symbol": CALL, "side": "buy"}, {"symbol": PUT, "side": "buy"}],
                    "order_class": "simple"
                })),
            )
            .await;

        assert_eq!(error_body(&result)["field"], "order_class");
    }

    #[tokio::test]
    async fn short_straddle_rejection_explained() {
        let mut trading = MockTradingPort::new();
        trading.expect_place_order().returning(|_| {
            Err(TradingError::new(
                TradingErrorKind::PermissionDenied,
                "account not eligible to trade uncovered option contracts",
            )
            .with_code("40310000"))
        });

        let result = trading_only(trading)
            .handle(
                "place_option_market_order",
                Some(json!({"legs": [
                    {"symbol": CALL, "side": "sell"},
                    {"symbol": PUT, "side": "sell"}
                ]})),
            )
            .await;

        let error = error_body(&result);
        assert_eq!(error["kind"], "permission_denied");
        assert_eq!(error["hint"], ShortStrategy::ShortStraddle.hint());
    }

    #[tokio::test]
    async fn short_strangle_rejection_explained() {
        let mut trading = MockTradingPort::new();
        trading.expect_place_order().returning(|_| {
            Err(TradingError::new(
                TradingErrorKind::PermissionDenied,
                "account not eligible to trade uncovered option contracts",
            )
            .with_code("40310000"))
        });

        let result = trading_only(trading)
            .handle(
                "place_option_market_order",
                Some(json!({"legs": [
                    {"symbol": CALL, "side": "sell"},
                    {"symbol": PUT_LOW, "side": "sell"}
                ]})),
            )
            .await;

        assert_eq!(
            error_body(&result)["hint"],
            ShortStrategy::ShortStrangle.hint()
        );
    }

    #[tokio::test]
    async fn contract_search_maps_filters() {
        let mut trading = MockTradingPort::new();
        trading
            .expect_get_option_contracts()
            .with(eq(OptionContractQuery {
                underlying_symbol: "SPY".into(),
                expiration_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 20),
                strike_price_gte: Some(dec!(500)),
                strike_price_lte: Some(dec!(600)),
                contract_type: Some(ContractType::Put),
                status: None,
                root_symbol: None,
                limit: Some(50),
            }))
            .times(1)
            .returning(|_| Ok(vec![]));

        let result = trading_only(trading)
            .handle(
                "get_option_contracts",
                Some(json!({
                    "underlying_symbol": "SPY",
                    "expiration_date": "2025-06-20",
                    "strike_price_gte": 500,
                    "strike_price_lte": "600",
                    "type": "PUT",
                    "limit": 50
                })),
            )
            .await;

        assert_eq!(text(&result), json!([]));
    }

    #[tokio::test]
    async fn inverted_strike_range_rejected() {
        let mut trading = MockTradingPort::new();
        trading.expect_get_option_contracts().times(0);

        let result = trading_only(trading)
            .handle(
                "get_option_contracts",
                Some(json!({"underlying_symbol": "SPY", "strike_price_gte": 600, "strike_price_lte": 500})),
            )
            .await;

        assert_eq!(error_body(&result)["field"], "strike_price_lte");
    }

    #[tokio::test]
    async fn latest_quote_missing_is_not_found() {
        let mut market = MockMarketDataPort::new();
        market
            .expect_get_option_latest_quotes()
            .with(eq(vec![CALL.to_string()]), eq(Some("indicative".to_string())))
            .returning(|_, _| Ok(Vec::<OptionQuote>::new()));

        let result = market_data_only(market)
            .handle(
                "get_option_latest_quote",
                Some(json!({"symbol": CALL, "feed": "indicative"})),
            )
            .await;

        assert_eq!(error_body(&result)["kind"], "not_found");
    }

    #[tokio::test]
    async fn snapshot_accepts_comma_list() {
        let mut market = MockMarketDataPort::new();
        market
            .expect_get_option_snapshots()
            .with(eq(vec![CALL.to_string(), PUT.to_string()]), eq(None))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let result = market_data_only(market)
            .handle(
                "get_option_snapshot",
                Some(json!({"symbol_or_symbols": format!("{CALL},{PUT}")})),
            )
            .await;

        assert!(!result.is_error());
    }
}
