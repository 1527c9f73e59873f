//! Stock market data tools.
//!
//! Historical windows are resolved here against the context clock, so the
//! adapter only ever sees absolute `[start, end]` ranges.

use super::optional_u32;
use crate::application::dto::{Bar, Quote, StockSnapshot, Trade};
use crate::application::ports::{BarsQuery, FeedOptions, TradesQuery};
use crate::domain::market_data::{BarWindow, Timeframe};
use crate::error::{ToolError, TradingError};
use crate::mcp::arguments::{Arguments, ParamKind, ParamSpec};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{ToolBuilder, ToolRegistry};

const STOCK_FEEDS: &[&str] = &["iex", "sip", "delayed_sip", "otc", "boats", "overnight"];
const SORT_ORDERS: &[&str] = &["asc", "desc"];
const DEFAULT_DAYS: i64 = 5;
const SUBSCRIPTION_HINT: &str = "The account's market data subscription does not cover this \
    feed. Retry with feed=\"iex\", which is free for all accounts.";

fn symbol() -> ParamSpec {
    ParamSpec::required("symbol", ParamKind::String, "Stock ticker, e.g. AAPL")
}

fn feed() -> ParamSpec {
    ParamSpec::optional(
        "feed",
        ParamKind::Enum(STOCK_FEEDS),
        "Data feed (iex is free; sip needs a subscription)",
    )
}

fn currency() -> ParamSpec {
    ParamSpec::optional(
        "currency",
        ParamKind::String,
        "Currency for prices, ISO 4217 (default USD)",
    )
}

fn days() -> ParamSpec {
    ParamSpec::optional(
        "days",
        ParamKind::Integer {
            min: Some(1),
            max: Some(3650),
        },
        "Days to look back when start is not given (default 5)",
    )
}

fn limit() -> ParamSpec {
    ParamSpec::optional(
        "limit",
        ParamKind::Integer {
            min: Some(1),
            max: Some(10_000),
        },
        "Maximum number of results",
    )
}

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolBuilder::new("get_stock_quote")
            .description("Latest bid/ask quote for a stock.")
            .param(symbol())
            .param(feed())
            .build(get_stock_quote),
    );

    registry.register(
        ToolBuilder::new("get_stock_bars")
            .description(
                "Historical OHLCV bars. timeframe is <n>Min, <n>Hour, <n>Day, <n>Week or \
                 <n>Month (e.g. 15Min, 1Day). With a minute or hour timeframe and a limit, the \
                 window covers exactly that many bars; otherwise it covers the last `days` days.",
            )
            .param(symbol())
            .param(days())
            .param(ParamSpec::optional(
                "timeframe",
                ParamKind::String,
                "Bar period (default 1Day)",
            ))
            .param(limit())
            .param(ParamSpec::optional(
                "start",
                ParamKind::Timestamp,
                "Window start, ISO-8601 date or date-time",
            ))
            .param(ParamSpec::optional(
                "end",
                ParamKind::Timestamp,
                "Window end, ISO-8601 date or date-time (default now)",
            ))
            .build(get_stock_bars),
    );

    registry.register(
        ToolBuilder::new("get_stock_trades")
            .description("Historical trades over the last `days` days.")
            .param(symbol())
            .param(days())
            .param(limit())
            .param(ParamSpec::optional(
                "sort",
                ParamKind::Enum(SORT_ORDERS),
                "Time order: asc or desc",
            ))
            .param(feed())
            .param(currency())
            .param(ParamSpec::optional(
                "asof",
                ParamKind::Date,
                "As-of date for symbol name changes (YYYY-MM-DD)",
            ))
            .build(get_stock_trades),
    );

    registry.register(
        ToolBuilder::new("get_stock_latest_trade")
            .description("Most recent trade for a stock.")
            .param(symbol())
            .param(feed())
            .param(currency())
            .build(get_stock_latest_trade),
    );

    registry.register(
        ToolBuilder::new("get_stock_latest_bar")
            .description("Most recent minute bar for a stock.")
            .param(symbol())
            .param(feed())
            .param(currency())
            .build(get_stock_latest_bar),
    );

    registry.register(
        ToolBuilder::new("get_stock_snapshot")
            .description(
                "Snapshot for one or more stocks: latest trade and quote, minute bar, daily bar \
                 and previous daily bar.",
            )
            .param(
                ParamSpec::required(
                    "symbols",
                    ParamKind::StringList,
                    "Ticker, or a list / comma-separated string of tickers",
                )
                .alias(&["symbol_or_symbols"]),
            )
            .param(feed())
            .param(currency())
            .build(get_stock_snapshot),
    );
}

fn feed_options(args: &Arguments) -> FeedOptions {
    FeedOptions {
        feed: args.str("feed").map(str::to_string),
        currency: args.str("currency").map(str::to_ascii_uppercase),
    }
}

fn with_subscription_hint(err: TradingError) -> ToolError {
    let premium = err.message_contains("sip") || err.message_contains("premium");
    if err.message_contains("subscription") && premium {
        err.with_hint(SUBSCRIPTION_HINT).into()
    } else {
        err.into()
    }
}

fn lookback_days(args: &Arguments) -> u32 {
    args.integer("days")
        .unwrap_or(DEFAULT_DAYS)
        .clamp(1, i64::from(u32::MAX)) as u32
}

async fn get_stock_quote(ctx: ToolContext, args: Arguments) -> Result<Quote, ToolError> {
    let symbol = args.require_path_id("symbol")?.to_string();
    ctx.market_data
        .get_latest_quote(symbol, feed_options(&args))
        .await
        .map_err(with_subscription_hint)
}

/// Build a bars query, resolving the window against `now`.
fn bars_query(args: &Arguments, now: chrono::DateTime<chrono::Utc>) -> Result<BarsQuery, ToolError> {
    let timeframe = match args.str("timeframe") {
        Some(raw) => Timeframe::parse(raw).map_err(|e| args.invalid("timeframe", e.to_string()))?,
        None => Timeframe::DAY,
    };
    let limit = optional_u32(args, "limit")?;
    let start = args.timestamp("start");
    let end = args.timestamp("end");

    let window = BarWindow::resolve(now, lookback_days(args), timeframe, limit, start, end);
    if window.start > window.end {
        return Err(args.invalid("start", "must not be after end"));
    }

    Ok(BarsQuery {
        symbol: args.require_path_id("symbol")?.to_string(),
        timeframe,
        window,
        limit,
    })
}

async fn get_stock_bars(ctx: ToolContext, args: Arguments) -> Result<Vec<Bar>, ToolError> {
    let query = bars_query(&args, ctx.now())?;
    ctx.market_data
        .get_bars(query)
        .await
        .map_err(with_subscription_hint)
}

async fn get_stock_trades(ctx: ToolContext, args: Arguments) -> Result<Vec<Trade>, ToolError> {
    let query = TradesQuery {
        symbol: args.require_path_id("symbol")?.to_string(),
        window: BarWindow::last_days(ctx.now(), lookback_days(&args)),
        limit: optional_u32(&args, "limit")?,
        sort: args.str("sort").map(str::to_string),
        feed: feed_options(&args),
        asof: args.date("asof"),
    };
    ctx.market_data
        .get_trades(query)
        .await
        .map_err(with_subscription_hint)
}

async fn get_stock_latest_trade(ctx: ToolContext, args: Arguments) -> Result<Trade, ToolError> {
    let symbol = args.require_path_id("symbol")?.to_string();
    ctx.market_data
        .get_latest_trade(symbol, feed_options(&args))
        .await
        .map_err(with_subscription_hint)
}

async fn get_stock_latest_bar(ctx: ToolContext, args: Arguments) -> Result<Bar, ToolError> {
    let symbol = args.require_path_id("symbol")?.to_string();
    ctx.market_data
        .get_latest_bar(symbol, feed_options(&args))
        .await
        .map_err(with_subscription_hint)
}

async fn get_stock_snapshot(
    ctx: ToolContext,
    args: Arguments,
) -> Result<Vec<StockSnapshot>, ToolError> {
    let symbols = args.require_list("symbols")?.to_vec();
    ctx.market_data
        .get_snapshots(symbols, feed_options(&args))
        .await
        .map_err(with_subscription_hint)
}
