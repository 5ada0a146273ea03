//! Logging and tracing setup.
//!
//! Installs a `tracing-subscriber` registry with:
//!
//! - an `EnvFilter` (`RUST_LOG` wins over the configured level)
//! - a JSON or pretty console formatter
//! - an optional OpenTelemetry layer exporting spans over OTLP gRPC
//!
//! # Usage
//!
//! ```rust,ignore
//! use order_engine::telemetry::init_telemetry;
//!
//! let _guard = init_telemetry(&config.observability);
//! ```

use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, ObservabilityConfig};

/// Guard that shuts down the tracer provider on drop.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Error shutting down tracer provider: {e:?}");
        }
    }
}

/// Build the level filter. `RUST_LOG` takes precedence over `level`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
    }
}

fn build_provider(endpoint: &str, service_name: &str) -> Option<SdkTracerProvider> {
    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
    {
        Ok(exp) => exp,
        Err(e) => {
            eprintln!("Failed to create OTLP exporter: {e:?}, falling back to console logging");
            return None;
        }
    };

    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new("service.name", service_name.to_string()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ])
        .build();

    Some(
        SdkTracerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build(),
    )
}

/// Initialize logging, plus OTLP span export when enabled.
///
/// Returns a guard that flushes and shuts down the tracer provider when dropped.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
#[must_use]
pub fn init_telemetry(config: &ObservabilityConfig) -> TelemetryGuard {
    let provider = if config.tracing.enabled {
        build_provider(&config.tracing.otlp_endpoint, &config.tracing.service_name)
    } else {
        None
    };

    let otel_layer = provider.as_ref().map(|p| {
        tracing_opentelemetry::layer().with_tracer(p.tracer(config.tracing.service_name.clone()))
    });

    Registry::default()
        .with(fmt_layer(config.logging.format))
        .with(otel_layer)
        .with(env_filter(&config.logging.level))
        .init();

    if provider.is_some() {
        tracing::info!(
            service_name = %config.tracing.service_name,
            endpoint = %config.tracing.otlp_endpoint,
            "OpenTelemetry initialized"
        );
    }

    TelemetryGuard { provider }
}
