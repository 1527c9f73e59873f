//! Market clock and calendar tools.

use crate::application::dto::{CalendarDay, MarketClock};
use crate::error::ToolError;
use crate::mcp::arguments::{Arguments, ParamKind, ParamSpec};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{ToolBuilder, ToolRegistry};

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolBuilder::new("get_market_clock")
            .description("Whether the market is open now, and the next open and close times.")
            .build(get_market_clock),
    );

    registry.register(
        ToolBuilder::new("get_market_calendar")
            .description("Trading days with open and close times between two dates, inclusive.")
            .param(ParamSpec::required(
                "start_date",
                ParamKind::Date,
                "First date (YYYY-MM-DD)",
            ))
            .param(ParamSpec::required(
                "end_date",
                ParamKind::Date,
                "Last date (YYYY-MM-DD)",
            ))
            .build(get_market_calendar),
    );
}

async fn get_market_clock(ctx: ToolContext, _args: Arguments) -> Result<MarketClock, ToolError> {
    Ok(ctx.trading.get_clock().await?)
}

async fn get_market_calendar(
    ctx: ToolContext,
    args: Arguments,
) -> Result<Vec<CalendarDay>, ToolError> {
    let start = args.require_date("start_date")?;
    let end = args.require_date("end_date")?;
    if end < start {
        return Err(args.invalid("end_date", "must not be before start_date"));
    }
    Ok(ctx.trading.get_calendar(start, end).await?)
}
