//! Corporate action announcements.

use chrono::Duration;

use crate::application::dto::CorporateAnnouncement;
use crate::application::ports::AnnouncementQuery;
use crate::error::ToolError;
use crate::mcp::arguments::{Arguments, ParamKind, ParamSpec};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{ToolBuilder, ToolRegistry};

const CA_TYPES: &[&str] = &["dividend", "merger", "spinoff", "split"];
const DATE_TYPES: &[&str] = &["declaration_date", "ex_date", "record_date", "payable_date"];

/// Widest range the broker accepts for one query.
const MAX_RANGE_DAYS: i64 = 90;

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolBuilder::new("get_corporate_announcements")
            .description(
                "Dividend, merger, spinoff and split announcements in a date range of at most 90 days.",
            )
            .param(ParamSpec::required(
                "ca_types",
                ParamKind::StringList,
                "Action types: dividend, merger, spinoff, split",
            ))
            .param(ParamSpec::required("since", ParamKind::Date, "Range start (YYYY-MM-DD)"))
            .param(ParamSpec::required("until", ParamKind::Date, "Range end (YYYY-MM-DD)"))
            .param(ParamSpec::optional("symbol", ParamKind::String, "Filter by symbol"))
            .param(ParamSpec::optional("cusip", ParamKind::String, "Filter by CUSIP"))
            .param(ParamSpec::optional(
                "date_type",
                ParamKind::Enum(DATE_TYPES),
                "Which announcement date the range applies to",
            ))
            .build(get_corporate_announcements),
    );
}

async fn get_corporate_announcements(
    ctx: ToolContext,
    args: Arguments,
) -> Result<Vec<CorporateAnnouncement>, ToolError> {
    let mut ca_types = Vec::new();
    for raw in args.require_list("ca_types")? {
        let ca_type = raw.to_ascii_lowercase();
        if !CA_TYPES.contains(&ca_type.as_str()) {
            return Err(args.invalid(
                "ca_types",
                format!("`{raw}` is not one of: {}", CA_TYPES.join(", ")),
            ));
        }
        ca_types.push(ca_type);
    }

    let since = args.require_date("since")?;
    let until = args.require_date("until")?;
    if until < since {
        return Err(args.invalid("until", "must not be before since"));
    }
    if until - since > Duration::days(MAX_RANGE_DAYS) {
        return Err(args.invalid(
            "until",
            format!("range must not exceed {MAX_RANGE_DAYS} days"),
        ));
    }

    let query = AnnouncementQuery {
        ca_types,
        since,
        until,
        symbol: args.str("symbol").map(str::to_string),
        cusip: args.str("cusip").map(str::to_string),
        date_type: args.str("date_type").map(str::to_string),
    };
    Ok(ctx.trading.get_corporate_announcements(query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTradingPort;
    use crate::mcp::test_support::{error_body, text, trading_only};
    use chrono::NaiveDate;
    use serde_json::json;

    #[tokio::test]
    async fn normalizes_types() {
        let mut trading = MockTradingPort::new();
        trading
            .expect_get_corporate_announcements()
            .withf(|q| {
                q.ca_types == ["dividend", "split"]
                    && q.since == NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    && q.symbol.as_deref() == Some("AAPL")
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let result = trading_only(trading)
            .handle(
                "get_corporate_announcements",
                Some(json!({
                    "ca_types": ["Dividend", "SPLIT"],
                    "since": "2024-01-01",
                    "until": "2024-03-01",
                    "symbol": "AAPL"
                })),
            )
            .await;

        assert_eq!(text(&result), json!([]));
    }

    #[tokio::test]
    async fn rejects_unknown_type() {
        let mut trading = MockTradingPort::new();
        trading.expect_get_corporate_announcements().times(0);

        let result = trading_only(trading)
            .handle(
                "get_corporate_announcements",
                Some(json!({"ca_types": "dividend,ipo", "since": "2024-01-01", "until": "2024-01-31"})),
            )
            .await;

        assert_eq!(error_body(&result)["field"], "ca_types");
    }

    #[tokio::test]
    async fn rejects_wide_range() {
        let mut trading = MockTradingPort::new();
        trading.expect_get_corporate_announcements().times(0);

        let result = trading_only(trading)
            .handle(
                "get_corporate_announcements",
                Some(json!({"ca_types": "split", "since": "2024-01-01", "until": "2024-12-31"})),
            )
            .await;

        assert_eq!(error_body(&result)["field"], "until");
    }
}
