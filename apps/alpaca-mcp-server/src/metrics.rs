//! Prometheus Metrics
//!
//! Tool call counters and latency, recorded through the `metrics` facade.
//! Without an installed recorder every call below is a no-op.
//!
//! - `mcp_tool_calls_total{tool}`
//! - `mcp_tool_errors_total{tool,kind}`
//! - `mcp_tool_duration_seconds{tool}`

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder with an HTTP listener on `port`.
///
/// Port 0 leaves metrics disabled. Must be called from within a Tokio runtime.
pub fn init_metrics(port: u16) -> Result<bool, BuildError> {
    if port == 0 {
        return Ok(false);
    }

    PrometheusBuilder::new()
        .with_http_listener(SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
        .install()?;
    register_metrics();
    Ok(true)
}

fn register_metrics() {
    describe_counter!("mcp_tool_calls_total", "Total tool calls by tool name");
    describe_counter!(
        "mcp_tool_errors_total",
        "Total failed tool calls by tool name and error kind"
    );
    describe_histogram!(
        "mcp_tool_duration_seconds",
        "Tool call latency including upstream requests"
    );
}

/// Record one finished tool call.
pub fn record_tool_call(tool: &str, duration: Duration, error_kind: Option<&'static str>) {
    let tool = tool.to_string();
    counter!("mcp_tool_calls_total", "tool" => tool.clone()).increment(1);
    histogram!("mcp_tool_duration_seconds", "tool" => tool.clone()).record(duration.as_secs_f64());
    if let Some(kind) = error_kind {
        counter!("mcp_tool_errors_total", "tool" => tool, "kind" => kind).increment(1);
    }
}
