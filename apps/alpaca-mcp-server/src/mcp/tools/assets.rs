//! Asset tools.

use crate::application::dto::Asset;
use crate::application::ports::AssetQuery;
use crate::error::ToolError;
use crate::mcp::arguments::{Arguments, ParamKind, ParamSpec};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{ToolBuilder, ToolRegistry};

const ASSET_STATUSES: &[&str] = &["active", "inactive"];
const ASSET_CLASSES: &[&str] = &["us_equity", "us_option", "crypto"];

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolBuilder::new("get_asset_info")
            .description("Look up an asset: exchange, status and whether it is tradable, shortable or fractionable.")
            .param(ParamSpec::required("symbol", ParamKind::String, "Ticker or asset ID"))
            .build(get_asset_info),
    );

    registry.register(
        ToolBuilder::new("get_all_assets")
            .description("List assets, optionally filtered by status, class, exchange and attributes.")
            .param(ParamSpec::optional(
                "status",
                ParamKind::Enum(ASSET_STATUSES),
                "active or inactive",
            ))
            .param(ParamSpec::optional(
                "asset_class",
                ParamKind::Enum(ASSET_CLASSES),
                "Asset class",
            ))
            .param(ParamSpec::optional(
                "exchange",
                ParamKind::String,
                "Exchange, e.g. NASDAQ or NYSE",
            ))
            .param(ParamSpec::optional(
                "attributes",
                ParamKind::StringList,
                "Required attributes, e.g. ptp_no_exception,options_enabled",
            ))
            .build(get_all_assets),
    );
}

async fn get_asset_info(ctx: ToolContext, args: Arguments) -> Result<Asset, ToolError> {
    let symbol = args.require_path_id("symbol")?;
    Ok(ctx.trading.get_asset(symbol.to_string()).await?)
}

async fn get_all_assets(ctx: ToolContext, args: Arguments) -> Result<Vec<Asset>, ToolError> {
    let query = AssetQuery {
        status: args.str("status").map(str::to_string),
        asset_class: args.str("asset_class").map(str::to_string),
        exchange: args.str("exchange").map(str::to_ascii_uppercase),
        attributes: args.list("attributes").map(<[String]>::to_vec).unwrap_or_default(),
    };
    Ok(ctx.trading.get_assets(query).await?)
}
