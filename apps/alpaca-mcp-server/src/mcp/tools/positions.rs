//! Position tools.

use rust_decimal_macros::dec;

use crate::application::dto::{ClosePositionResult, Order, Position};
use crate::application::ports::CloseAmount;
use crate::error::{ToolError, TradingError};
use crate::mcp::arguments::{Arguments, ParamKind, ParamSpec};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{ToolBuilder, ToolRegistry};

const ZERO_SIZE_CODE: &str = "42210000";
const ZERO_SIZE_HINT: &str = "Closing this percentage rounds down to zero shares. Use a higher \
    percentage, close the full position, or pass qty with a whole number of shares.";

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolBuilder::new("get_positions")
            .description("List all open positions with cost basis, market value and unrealized P/L.")
            .build(get_positions),
    );

    registry.register(
        ToolBuilder::new("get_open_position")
            .description("Get the open position in one symbol.")
            .param(ParamSpec::required(
                "symbol",
                ParamKind::String,
                "Stock ticker or OCC option symbol",
            ))
            .build(get_open_position),
    );

    registry.register(
        ToolBuilder::new("close_position")
            .description(
                "Close all or part of a position with a market order. Pass either qty or \
                 percentage; with neither the whole position is closed.",
            )
            .param(ParamSpec::required(
                "symbol",
                ParamKind::String,
                "Stock ticker or OCC option symbol",
            ))
            .param(ParamSpec::optional(
                "qty",
                ParamKind::Number,
                "Number of shares or contracts to close",
            ))
            .param(ParamSpec::optional(
                "percentage",
                ParamKind::Number,
                "Percentage of the position to close, greater than 0 and at most 100",
            ))
            .build(close_position),
    );

    registry.register(
        ToolBuilder::new("close_all_positions")
            .description("Close every open position, optionally canceling open orders first.")
            .param(ParamSpec::optional(
                "cancel_orders",
                ParamKind::Boolean,
                "Cancel all open orders before liquidating (default false)",
            ))
            .build(close_all_positions),
    );
}

async fn get_positions(ctx: ToolContext, _args: Arguments) -> Result<Vec<Position>, ToolError> {
    Ok(ctx.trading.get_positions().await?)
}

async fn get_open_position(ctx: ToolContext, args: Arguments) -> Result<Position, ToolError> {
    let symbol = args.require_path_id("symbol")?;
    Ok(ctx.trading.get_open_position(symbol.to_string()).await?)
}

fn close_amount(args: &Arguments) -> Result<Option<CloseAmount>, ToolError> {
    let qty = args.positive_decimal("qty")?;
    let percentage = args.positive_decimal("percentage")?;

    match (qty, percentage) {
        (Some(_), Some(_)) => Err(args.invalid("percentage", "cannot be combined with qty")),
        (Some(qty), None) => Ok(Some(CloseAmount::Qty(qty))),
        (None, Some(pct)) if pct > dec!(100) => {
            Err(args.invalid("percentage", "must be at most 100"))
        }
        (None, Some(pct)) => Ok(Some(CloseAmount::Percentage(pct))),
        (None, None) => Ok(None),
    }
}

fn with_zero_size_hint(err: TradingError) -> TradingError {
    if err.has_code(ZERO_SIZE_CODE) || err.message_contains("would result in order size of zero")
    {
        err.with_hint(ZERO_SIZE_HINT)
    } else {
        err
    }
}

async fn close_position(ctx: ToolContext, args: Arguments) -> Result<Order, ToolError> {
    let symbol = args.require_path_id("symbol")?.to_string();
    let amount = close_amount(&args)?;

    ctx.trading
        .close_position(symbol, amount)
        .await
        .map_err(|e| with_zero_size_hint(e).into())
}

async fn close_all_positions(
    ctx: ToolContext,
    args: Arguments,
) -> Result<Vec<ClosePositionResult>, ToolError> {
    let cancel_orders = args.boolean("cancel_orders").unwrap_or(false);
    Ok(ctx.trading.close_all_positions(cancel_orders).await?)
}
