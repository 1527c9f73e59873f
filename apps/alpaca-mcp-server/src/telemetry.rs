//! Tracing Setup
//!
//! Structured logs go to **stderr**; stdout carries the MCP protocol and must
//! never see a log line. Spans are optionally exported over OTLP.
//!
//! # Configuration
//!
//! - `RUST_LOG`: log filter (default: `alpaca_mcp_server=info`)
//! - `OTEL_ENABLED`: export spans over OTLP (default: `false`)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP gRPC endpoint (default: `http://localhost:4317`)
//! - `OTEL_SERVICE_NAME`: service name for traces (default: `alpaca-mcp-server`)

use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::TelemetrySettings;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "alpaca_mcp_server=info";

/// Keeps the span exporter alive. Flushes and shuts it down on drop.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// True when spans are being exported.
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        let Some(provider) = self.provider.take() else {
            return;
        };
        // The subscriber may already be gone, so report on stderr directly.
        if let Err(e) = provider.shutdown() {
            eprintln!("tracer provider shutdown failed: {e:?}");
        }
    }
}

fn tracer_provider(
    settings: &TelemetrySettings,
) -> Result<SdkTracerProvider, Box<dyn std::error::Error + Send + Sync>> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&settings.otlp_endpoint)
        .build()?;
    Ok(SdkTracerProvider::builder()
        .with_simple_exporter(exporter)
        .build())
}

/// Install the global subscriber.
///
/// When OTLP export is enabled but the exporter cannot be built, logging
/// still comes up on stderr and the failure is logged once.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
#[must_use]
pub fn init_telemetry(settings: &TelemetrySettings) -> TelemetryGuard {
    let (provider, export_error) = if settings.otel_enabled {
        match tracer_provider(settings) {
            Ok(provider) => (Some(provider), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    let otel_layer = provider.as_ref().map(|p| {
        tracing_opentelemetry::layer().with_tracer(p.tracer(settings.service_name.clone()))
    });
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    Registry::default()
        .with(filter)
        .with(stderr)
        .with(otel_layer)
        .init();

    if let Some(e) = export_error {
        tracing::warn!(
            endpoint = %settings.otlp_endpoint,
            error = %e,
            "OTLP exporter unavailable, logging to stderr only"
        );
    } else if provider.is_some() {
        tracing::info!(
            service_name = %settings.service_name,
            endpoint = %settings.otlp_endpoint,
            "OpenTelemetry initialized"
        );
    }

    TelemetryGuard { provider }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_guard_reports_no_export() {
        let guard = TelemetryGuard { provider: None };
        assert!(!guard.is_exporting());
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
