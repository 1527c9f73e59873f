//! Account tool.

use crate::application::dto::Account;
use crate::error::ToolError;
use crate::mcp::arguments::Arguments;
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{ToolBuilder, ToolRegistry};

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolBuilder::new("get_account_info")
            .description(
                "Get the trading account: status, cash, buying power, equity and trading restrictions.",
            )
            .build(get_account_info),
    );
}

async fn get_account_info(ctx: ToolContext, _args: Arguments) -> Result<Account, ToolError> {
    Ok(ctx.trading.get_account().await?)
}
