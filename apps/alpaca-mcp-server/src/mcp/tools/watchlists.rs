//! Watchlist tools.

use super::Ack;
use crate::application::dto::Watchlist;
use crate::application::ports::WatchlistUpdate;
use crate::error::ToolError;
use crate::mcp::arguments::{Arguments, ParamKind, ParamSpec};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{ToolBuilder, ToolRegistry};

fn watchlist_id() -> ParamSpec {
    ParamSpec::required("watchlist_id", ParamKind::String, "Watchlist ID")
}

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolBuilder::new("create_watchlist")
            .description("Create a named watchlist of symbols.")
            .param(ParamSpec::required("name", ParamKind::String, "Watchlist name"))
            .param(ParamSpec::required(
                "symbols",
                ParamKind::StringList,
                "Symbols as a list or comma-separated string",
            ))
            .build(create_watchlist),
    );

    registry.register(
        ToolBuilder::new("get_watchlists")
            .description("List all watchlists.")
            .build(get_watchlists),
    );

    registry.register(
        ToolBuilder::new("get_watchlist_by_id")
            .description("Get one watchlist with its symbols.")
            .param(watchlist_id())
            .build(get_watchlist_by_id),
    );

    registry.register(
        ToolBuilder::new("update_watchlist")
            .description("Rename a watchlist and/or replace its symbols.")
            .param(watchlist_id())
            .param(ParamSpec::optional("name", ParamKind::String, "New name"))
            .param(ParamSpec::optional(
                "symbols",
                ParamKind::StringList,
                "Replacement symbol list",
            ))
            .build(update_watchlist),
    );

    registry.register(
        ToolBuilder::new("delete_watchlist")
            .description("Delete a watchlist.")
            .param(watchlist_id())
            .build(delete_watchlist),
    );
}

async fn create_watchlist(ctx: ToolContext, args: Arguments) -> Result<Watchlist, ToolError> {
    let name = args.require_str("name")?.to_string();
    let symbols = args.require_list("symbols")?.to_vec();
    Ok(ctx.trading.create_watchlist(name, symbols).await?)
}

async fn get_watchlists(ctx: ToolContext, _args: Arguments) -> Result<Vec<Watchlist>, ToolError> {
    Ok(ctx.trading.get_watchlists().await?)
}

async fn get_watchlist_by_id(ctx: ToolContext, args: Arguments) -> Result<Watchlist, ToolError> {
    let id = args.require_path_id("watchlist_id")?;
    Ok(ctx.trading.get_watchlist(id.to_string()).await?)
}

async fn update_watchlist(ctx: ToolContext, args: Arguments) -> Result<Watchlist, ToolError> {
    let id = args.require_path_id("watchlist_id")?.to_string();
    let update = WatchlistUpdate {
        name: args.str("name").map(str::to_string),
        symbols: args.list("symbols").map(<[String]>::to_vec),
    };
    if update.name.is_none() && update.symbols.is_none() {
        return Err(args.invalid("name", "give name, symbols, or both"));
    }
    Ok(ctx.trading.update_watchlist(id, update).await?)
}

async fn delete_watchlist(ctx: ToolContext, args: Arguments) -> Result<Ack, ToolError> {
    let id = args.require_path_id("watchlist_id")?.to_string();
    ctx.trading.delete_watchlist(id.clone()).await?;
    Ok(Ack {
        id,
        status: "deleted",
    })
}
